use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::mfj_2025;
use crate::models::{BracketTable, FilingStatusCode, Jurisdiction};

/// Identifies one bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableKey {
    pub tax_year: i32,
    pub jurisdiction: Jurisdiction,
    pub filing_status: FilingStatusCode,
}

impl TableKey {
    pub fn new(
        tax_year: i32,
        jurisdiction: Jurisdiction,
        filing_status: FilingStatusCode,
    ) -> Self {
        Self {
            tax_year,
            jurisdiction,
            filing_status,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}/{}", self.tax_year, self.jurisdiction, self.filing_status)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableLookupError {
    #[error("no bracket table for {requested}; available: {available}")]
    NotFound { requested: TableKey, available: String },
}

/// Bracket tables keyed by `(year, jurisdiction, filing status)`.
///
/// Typical lifetime:
/// 1. Create with [`TaxTableRegistry::with_builtin_tables`].
/// 2. Call `register` for every table loaded from elsewhere.
/// 3. Apply to a config with [`crate::TaxYearConfig::with_registry_tables`].
#[derive(Debug, Clone, Default)]
pub struct TaxTableRegistry {
    tables: HashMap<TableKey, BracketTable>,
}

impl TaxTableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Registry pre-populated with every table that ships with the crate.
    pub fn with_builtin_tables() -> Self {
        let status = FilingStatusCode::MarriedFilingJointly;
        let year = mfj_2025::TAX_YEAR;

        let mut registry = Self::new();
        registry.register(
            TableKey::new(year, Jurisdiction::Federal, status),
            mfj_2025::federal_brackets(),
        );
        registry.register(
            TableKey::new(year, Jurisdiction::California, status),
            mfj_2025::california_brackets(),
        );
        registry.register(
            TableKey::new(year, Jurisdiction::Oklahoma, status),
            mfj_2025::oklahoma_brackets(),
        );
        registry
    }

    /// Register a table. An existing table under the same key is replaced.
    pub fn register(
        &mut self,
        key: TableKey,
        table: BracketTable,
    ) {
        if self.tables.insert(key, table).is_some() {
            debug!(%key, "replaced bracket table");
        }
    }

    /// Every registered key, sorted.
    pub fn keys(&self) -> Vec<TableKey> {
        let mut keys: Vec<_> = self.tables.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// # Errors
    /// [`TableLookupError::NotFound`] names the requested key and lists the
    /// available ones.
    pub fn get(
        &self,
        key: &TableKey,
    ) -> Result<&BracketTable, TableLookupError> {
        self.tables.get(key).ok_or_else(|| TableLookupError::NotFound {
            requested: *key,
            available: self
                .keys()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
