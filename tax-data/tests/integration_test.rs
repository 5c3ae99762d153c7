//! Integration tests that load the shipped fixture files end to end.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{
    FilingStatusCode, Jurisdiction, TableKey, TaxTableRegistry, VestingSummary, YtdTotals,
    calculations::vest_income_for_year,
};
use tax_data::{BracketTableLoader, paystubs, parse_vesting_csv, validate_vesting_schedule};

const VESTING_CSV: &str = include_str!("../test-data/vesting_schedule.csv");

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

fn date(
    y: i32,
    m: u32,
    d: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Bracket tables
// =============================================================================

#[test]
fn test_bracket_fixture_matches_builtin_tables() {
    let mut loaded = TaxTableRegistry::new();
    let builtin = TaxTableRegistry::with_builtin_tables();

    let count = BracketTableLoader::load_from_file(&mut loaded, &fixture("brackets_2025_mfj.csv"))
        .expect("fixture should load");

    assert_eq!(count, 3);
    assert_eq!(loaded.keys(), builtin.keys());
    for jurisdiction in Jurisdiction::ALL {
        let key = TableKey::new(2025, jurisdiction, FilingStatusCode::MarriedFilingJointly);
        assert_eq!(loaded.get(&key).unwrap(), builtin.get(&key).unwrap());
    }
}

#[test]
fn test_missing_bracket_file_is_io_error() {
    let mut registry = TaxTableRegistry::new();

    let err = BracketTableLoader::load_from_file(&mut registry, &fixture("does_not_exist.csv"))
        .unwrap_err();

    assert!(matches!(err, tax_data::BracketCsvError::Io { .. }), "got {err:?}");
    assert!(registry.is_empty());
}

// =============================================================================
// Paystubs
// =============================================================================

#[test]
fn test_paystub_fixture_aggregates_to_ytd() {
    let stubs = paystubs::load_from_file(&fixture("paystubs_2025.csv")).unwrap();

    let ytd = YtdTotals::from_paystubs(&stubs);

    assert_eq!(ytd.paystub_count, 4);
    assert_eq!(ytd.gross_income, dec!(69230.76));
    assert_eq!(ytd.pretax_401k, dec!(3618.48));
    assert_eq!(ytd.rsu_income, dec!(20000.00));
    assert_eq!(ytd.total_withheld(), dec!(25696.16));
    assert!(stubs.iter().all(|s| s.validation_warnings().is_empty()));
}

// =============================================================================
// Vesting schedules
// =============================================================================

#[test]
fn test_vesting_fixture_parses_and_validates_cleanly() {
    let events = parse_vesting_csv(VESTING_CSV).unwrap();

    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e.symbol == "GOOG"));
    assert_eq!(events[2].fmv_at_vest, dec!(1160.00));
    assert_eq!(events[3].grant_date, date(2025, 2, 1));
    assert!(validate_vesting_schedule(&events).is_empty());
}

#[test]
fn test_vesting_fixture_summary_and_income() {
    let events = parse_vesting_csv(VESTING_CSV).unwrap();

    let summary = VestingSummary::build(&events, date(2025, 6, 1));

    assert_eq!(summary.total_grants, 2);
    assert_eq!(summary.total_shares_granted, 475);
    assert_eq!(summary.total_shares_vested, 425);
    assert_eq!(summary.total_shares_pending, 50);
    assert_eq!(
        summary.past_vests.iter().map(|e| e.vesting_date).collect::<Vec<_>>(),
        vec![date(2025, 5, 15), date(2025, 3, 15), date(2024, 6, 15)]
    );
    assert_eq!(summary.upcoming_vests.len(), 1);

    // 125 × 1,160 + 50 × 170 + 50 × 185.40
    assert_eq!(vest_income_for_year(&events, 2025), dec!(162770.00));
}
