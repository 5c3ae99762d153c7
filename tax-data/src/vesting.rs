//! RSU vesting schedule import.
//!
//! Brokerage exports vary, so the header row is matched by name, extra
//! columns are ignored, and several date and money spellings are accepted.
//! Every error names the spreadsheet row (header = row 1).

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tax_core::RsuVestingEvent;
use thiserror::Error;
use tracing::{debug, warn};

const REQUIRED_COLUMNS: [&str; 6] = [
    "grant_id",
    "symbol",
    "grant_date",
    "vesting_date",
    "shares_vesting",
    "fmv_at_vest",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d"];

/// Above this many shares in one grant the import is probably wrong.
const SHARE_WARNING_THRESHOLD: u64 = 100_000;

#[derive(Debug, Error, PartialEq)]
pub enum VestingCsvError {
    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("vesting CSV has no header row")]
    NoHeader,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: cannot parse {column} '{value}' as a date")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: cannot parse {column} '{value}' as a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: vesting date {vesting_date} is before grant date {grant_date}")]
    VestBeforeGrant {
        row: usize,
        grant_date: NaiveDate,
        vesting_date: NaiveDate,
    },

    #[error("row {row}: shares_vesting must be positive")]
    NonPositiveShares { row: usize },

    #[error("row {row}: fmv_at_vest cannot be negative")]
    NegativeFmv { row: usize },

    #[error("no vesting events found")]
    NoEvents,
}

impl From<csv::Error> for VestingCsvError {
    fn from(err: csv::Error) -> Self {
        VestingCsvError::Csv(err.to_string())
    }
}

/// Something odd about an otherwise valid schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VestingWarning {
    MultipleSymbols { grant_id: String, symbols: Vec<String> },
    MultipleGrantDates { grant_id: String },
    DuplicateVestingDates { grant_id: String },
    UnusuallyManyShares { grant_id: String, total: u64 },
}

impl fmt::Display for VestingWarning {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            VestingWarning::MultipleSymbols { grant_id, symbols } => {
                write!(f, "grant {grant_id} has multiple symbols: {}", symbols.join(", "))
            }
            VestingWarning::MultipleGrantDates { grant_id } => {
                write!(f, "grant {grant_id} has multiple grant dates")
            }
            VestingWarning::DuplicateVestingDates { grant_id } => {
                write!(f, "grant {grant_id} has duplicate vesting dates")
            }
            VestingWarning::UnusuallyManyShares { grant_id, total } => {
                write!(f, "grant {grant_id} has an unusually large number of shares: {total}")
            }
        }
    }
}

/// Column name to field index for one file's header row.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, VestingCsvError> {
        if headers.iter().all(str::is_empty) {
            return Err(VestingCsvError::NoHeader);
        }

        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_ascii_lowercase(), idx))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !map.contains_key(**col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(VestingCsvError::MissingColumns(missing));
        }

        Ok(Self(map))
    }

    fn value<'r>(
        &self,
        record: &'r csv::StringRecord,
        column: &'static str,
        row: usize,
    ) -> Result<&'r str, VestingCsvError> {
        self.0
            .get(column)
            .and_then(|&idx| record.get(idx))
            .filter(|v| !v.is_empty())
            .ok_or(VestingCsvError::MissingValue { row, column })
    }
}

/// Parse a vesting schedule export into events, in file order.
pub fn parse_vesting_csv(input: &str) -> Result<Vec<RsuVestingEvent>, VestingCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut events = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = idx + 2;
        if record.iter().all(str::is_empty) {
            continue;
        }
        events.push(parse_event(&columns, &record, row)?);
    }

    if events.is_empty() {
        return Err(VestingCsvError::NoEvents);
    }

    debug!(events = events.len(), "parsed vesting schedule");
    Ok(events)
}

fn parse_event(
    columns: &Columns,
    record: &csv::StringRecord,
    row: usize,
) -> Result<RsuVestingEvent, VestingCsvError> {
    let grant_id = columns.value(record, "grant_id", row)?.to_string();
    let symbol = columns.value(record, "symbol", row)?.to_uppercase();
    let grant_date = parse_date(columns.value(record, "grant_date", row)?, "grant_date", row)?;
    let vesting_date = parse_date(
        columns.value(record, "vesting_date", row)?,
        "vesting_date",
        row,
    )?;

    if vesting_date < grant_date {
        return Err(VestingCsvError::VestBeforeGrant {
            row,
            grant_date,
            vesting_date,
        });
    }

    let shares = parse_decimal(
        columns.value(record, "shares_vesting", row)?,
        "shares_vesting",
        row,
    )?
    .trunc();
    if shares <= Decimal::ZERO {
        return Err(VestingCsvError::NonPositiveShares { row });
    }
    let shares_vesting = shares.to_u64().ok_or_else(|| VestingCsvError::InvalidNumber {
        row,
        column: "shares_vesting",
        value: shares.to_string(),
    })?;

    let fmv_at_vest = parse_decimal(
        columns.value(record, "fmv_at_vest", row)?,
        "fmv_at_vest",
        row,
    )?;
    if fmv_at_vest < Decimal::ZERO {
        return Err(VestingCsvError::NegativeFmv { row });
    }

    Ok(RsuVestingEvent {
        grant_id,
        symbol,
        grant_date,
        vesting_date,
        shares_vesting,
        fmv_at_vest,
    })
}

fn parse_date(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<NaiveDate, VestingCsvError> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| VestingCsvError::InvalidDate {
            row,
            column,
            value: value.to_string(),
        })
}

/// Accepts `$1,234.50` style money as well as plain numbers.
fn parse_decimal(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<Decimal, VestingCsvError> {
    let cleaned: String = value.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    cleaned
        .trim()
        .parse::<Decimal>()
        .map_err(|_| VestingCsvError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        })
}

/// Sanity checks on a parsed schedule. Warnings are logged and returned;
/// none of them reject the data.
pub fn validate_vesting_schedule(events: &[RsuVestingEvent]) -> Vec<VestingWarning> {
    let mut grants: Vec<(&str, Vec<&RsuVestingEvent>)> = Vec::new();
    for event in events {
        match grants.iter_mut().find(|(id, _)| *id == event.grant_id) {
            Some((_, group)) => group.push(event),
            None => grants.push((event.grant_id.as_str(), vec![event])),
        }
    }

    let mut warnings = Vec::new();
    for (grant_id, group) in &grants {
        let mut symbols: Vec<String> = Vec::new();
        for event in group {
            if !symbols.contains(&event.symbol) {
                symbols.push(event.symbol.clone());
            }
        }
        if symbols.len() > 1 {
            warnings.push(VestingWarning::MultipleSymbols {
                grant_id: grant_id.to_string(),
                symbols,
            });
        }

        let grant_dates: HashSet<NaiveDate> = group.iter().map(|e| e.grant_date).collect();
        if grant_dates.len() > 1 {
            warnings.push(VestingWarning::MultipleGrantDates {
                grant_id: grant_id.to_string(),
            });
        }

        let vesting_dates: HashSet<NaiveDate> = group.iter().map(|e| e.vesting_date).collect();
        if vesting_dates.len() < group.len() {
            warnings.push(VestingWarning::DuplicateVestingDates {
                grant_id: grant_id.to_string(),
            });
        }

        let total: u64 = group.iter().map(|e| e.shares_vesting).sum();
        if total > SHARE_WARNING_THRESHOLD {
            warnings.push(VestingWarning::UnusuallyManyShares {
                grant_id: grant_id.to_string(),
                total,
            });
        }
    }

    for warning in &warnings {
        warn!(%warning, "vesting schedule");
    }
    warnings
}
