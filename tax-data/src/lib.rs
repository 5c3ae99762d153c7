//! CSV ingestion for bracket tables, paystubs and RSU vesting schedules.

pub mod brackets;
pub mod paystubs;
pub mod vesting;

pub use brackets::{BracketCsvError, BracketRecord, BracketTableLoader};
pub use paystubs::PaystubCsvError;
pub use vesting::{VestingCsvError, VestingWarning, parse_vesting_csv, validate_vesting_schedule};
