//! CSV loader for paystub records.
//!
//! ## CSV Format
//!
//! Column order does not matter (headers are matched by name).
//!
//! | Column             | Required | Type    | Notes                           |
//! |--------------------|----------|---------|---------------------------------|
//! | `pay_date`         | no       | date    | `YYYY-MM-DD`; empty for unknown |
//! | `gross_pay`        | yes      | decimal |                                 |
//! | `federal_withheld` | yes      | decimal |                                 |
//! | `state_withheld`   | yes      | decimal |                                 |
//! | `fica_withheld`    | yes      | decimal |                                 |
//! | `net_pay`          | yes      | decimal |                                 |
//! | `pretax_401k`      | yes      | decimal | `401k_contribution` also works  |
//! | `rsu_income`       | no       | decimal | Leave cell empty for `None`     |
//!
//! ```csv
//! pay_date,gross_pay,federal_withheld,state_withheld,fica_withheld,net_pay,pretax_401k,rsu_income
//! 2025-01-15,10000.00,2000.00,800.00,765.00,5535.00,900.00,
//! 2025-01-31,10000.00,2000.00,800.00,765.00,5535.00,900.00,25000.00
//! ```

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::Paystub;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct CsvRow {
    pay_date: Option<NaiveDate>,
    gross_pay: Decimal,
    federal_withheld: Decimal,
    state_withheld: Decimal,
    fica_withheld: Decimal,
    net_pay: Decimal,
    #[serde(alias = "401k_contribution")]
    pretax_401k: Decimal,
    rsu_income: Option<Decimal>,
}

impl From<CsvRow> for Paystub {
    fn from(row: CsvRow) -> Self {
        Paystub {
            pay_date: row.pay_date,
            gross_pay: row.gross_pay,
            federal_withheld: row.federal_withheld,
            state_withheld: row.state_withheld,
            fica_withheld: row.fica_withheld,
            net_pay: row.net_pay,
            pretax_401k: row.pretax_401k,
            rsu_income: row.rsu_income,
        }
    }
}

/// Errors that can occur while loading paystub CSV data.
#[derive(Debug, Error)]
pub enum PaystubCsvError {
    /// Bad structure, missing required column, type mismatch, etc.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse CSV text and return the paystubs in file order.
///
/// Each paystub's [`Paystub::validation_warnings`] are logged with the
/// spreadsheet row number (header = row 1); they do not fail the load.
pub fn load_from_str(input: &str) -> Result<Vec<Paystub>, PaystubCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let paystub = Paystub::from(result?);
            let row = idx + 2;
            for warning in paystub.validation_warnings() {
                warn!(row, %warning, "suspicious paystub");
            }
            Ok::<_, PaystubCsvError>(paystub)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<Paystub>, PaystubCsvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PaystubCsvError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
