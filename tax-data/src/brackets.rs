use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    Bracket, BracketTable, BracketTableError, FilingStatusCode, Jurisdiction, TableKey,
    TaxTableRegistry,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketCsvError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("row {row}: unknown jurisdiction '{value}'")]
    UnknownJurisdiction { value: String, row: usize },

    #[error("row {row}: unknown filing status '{value}'")]
    UnknownFilingStatus { value: String, row: usize },

    #[error("bracket table {key} is invalid: {source}")]
    InvalidTable {
        key: TableKey,
        #[source]
        source: BracketTableError,
    },

    #[error("no bracket rows found")]
    Empty,
}

impl From<csv::Error> for BracketCsvError {
    fn from(err: csv::Error) -> Self {
        BracketCsvError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket CSV file.
///
/// - `tax_year`: e.g. 2025
/// - `jurisdiction`: `federal`, `california` or `oklahoma` (`us`, `ca`, `ok`
///   also accepted)
/// - `filing_status`: `S`, `MFJ`, `MFS`, `HOH` or `QSS`
/// - `upper_limit`: top of the bracket; empty for the open-ended top bracket
/// - `rate`: marginal rate as a decimal (e.g. 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub jurisdiction: String,
    pub filing_status: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loads bracket tables from CSV into a [`TaxTableRegistry`].
///
/// Rows are grouped by `(tax_year, jurisdiction, filing_status)` in the order
/// they first appear; within a group, rows must be listed from the lowest
/// bracket to the top one.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketCsvError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into validated tables.
    ///
    /// # Errors
    ///
    /// Fails on an unrecognised jurisdiction or filing status, on a group
    /// that does not form a valid [`BracketTable`], or when there are no
    /// records at all.
    pub fn build(records: &[BracketRecord]) -> Result<Vec<(TableKey, BracketTable)>, BracketCsvError> {
        if records.is_empty() {
            return Err(BracketCsvError::Empty);
        }

        let mut groups: Vec<(TableKey, Vec<Bracket>)> = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let row = idx + 2; // header is row 1
            let key = Self::key_for(record, row)?;
            let bracket = Bracket {
                upper_limit: record.upper_limit,
                rate: record.rate,
            };

            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, brackets)) => brackets.push(bracket),
                None => groups.push((key, vec![bracket])),
            }
        }

        groups
            .into_iter()
            .map(|(key, brackets)| {
                BracketTable::new(brackets)
                    .map(|table| (key, table))
                    .map_err(|source| BracketCsvError::InvalidTable { key, source })
            })
            .collect()
    }

    /// Build tables from `records` and register each one, replacing any
    /// table already under the same key. Returns the number of tables loaded.
    ///
    /// Nothing is registered unless every group is valid.
    pub fn load(
        registry: &mut TaxTableRegistry,
        records: &[BracketRecord],
    ) -> Result<usize, BracketCsvError> {
        let tables = Self::build(records)?;
        let loaded = tables.len();

        for (key, table) in tables {
            debug!(%key, brackets = table.len(), "registering bracket table");
            registry.register(key, table);
        }

        Ok(loaded)
    }

    /// Convenience wrapper: read `path` and delegate to [`Self::parse`] and
    /// [`Self::load`].
    pub fn load_from_file(
        registry: &mut TaxTableRegistry,
        path: &Path,
    ) -> Result<usize, BracketCsvError> {
        let file = std::fs::File::open(path).map_err(|e| BracketCsvError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let records = Self::parse(file)?;
        let loaded = Self::load(registry, &records)?;
        info!(path = %path.display(), tables = loaded, "loaded bracket tables");
        Ok(loaded)
    }

    fn key_for(
        record: &BracketRecord,
        row: usize,
    ) -> Result<TableKey, BracketCsvError> {
        let jurisdiction = Jurisdiction::parse(&record.jurisdiction).ok_or_else(|| {
            BracketCsvError::UnknownJurisdiction {
                value: record.jurisdiction.clone(),
                row,
            }
        })?;
        let filing_status = FilingStatusCode::parse(&record.filing_status).ok_or_else(|| {
            BracketCsvError::UnknownFilingStatus {
                value: record.filing_status.clone(),
                row,
            }
        })?;
        Ok(TableKey::new(record.tax_year, jurisdiction, filing_status))
    }
}
