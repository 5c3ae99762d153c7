//! Household profile: the answers that rarely change between runs.
//!
//! ```toml
//! age = 52
//! prior_year_tax = 98000
//! prior_year_agi = 410000
//! oklahoma_income = 40000
//! pretax_401k = 23500
//! brackets = "brackets_2025_mfj.csv"
//! ```
//!
//! Every key is optional. A relative `brackets` path is resolved against the
//! profile's own directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdProfile {
    /// Age at year end, used for 401(k) catch-up eligibility.
    pub age: Option<u32>,
    pub prior_year_tax: Option<Decimal>,
    pub prior_year_agi: Option<Decimal>,
    pub oklahoma_income: Option<Decimal>,
    pub pretax_401k: Option<Decimal>,
    /// Bracket CSV overriding the built-in tables.
    pub brackets: Option<PathBuf>,
}

impl HouseholdProfile {
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid household profile")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("unable to read household profile at {}", path.display()))?;
        let mut profile = Self::parse(&raw)
            .with_context(|| format!("unable to parse household profile at {}", path.display()))?;

        if let (Some(brackets), Some(dir)) = (&profile.brackets, path.parent()) {
            if brackets.is_relative() {
                profile.brackets = Some(dir.join(brackets));
            }
        }

        debug!(path = %path.display(), ?profile, "loaded household profile");
        Ok(profile)
    }

    /// Loads `path` when given, else the empty profile.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_every_key() {
        let profile = HouseholdProfile::parse(
            r#"
            age = 52
            prior_year_tax = 98000
            prior_year_agi = "410000.50"
            oklahoma_income = 40000
            pretax_401k = 23500
            brackets = "tables.csv"
            "#,
        )
        .unwrap();

        assert_eq!(
            profile,
            HouseholdProfile {
                age: Some(52),
                prior_year_tax: Some(dec!(98000)),
                prior_year_agi: Some(dec!(410000.50)),
                oklahoma_income: Some(dec!(40000)),
                pretax_401k: Some(dec!(23500)),
                brackets: Some(PathBuf::from("tables.csv")),
            }
        );
    }

    #[test]
    fn empty_profile_is_all_defaults() {
        assert_eq!(HouseholdProfile::parse("").unwrap(), HouseholdProfile::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(HouseholdProfile::parse("filing_status = \"single\"").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = HouseholdProfile::load(Path::new("/nonexistent/profile.toml")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/profile.toml"), "got {err}");
    }

    #[test]
    fn no_path_gives_empty_profile() {
        assert_eq!(
            HouseholdProfile::load_optional(None).unwrap(),
            HouseholdProfile::default()
        );
    }
}
