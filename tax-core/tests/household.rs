//! End-to-end checks for a 2025 MFJ household through the public API.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::calculations::brackets::bracket_tax;
use tax_core::{
    Bracket, BracketTable, ContributionOptimizer, FilingStatusCode, Jurisdiction,
    MarginalRateResolver, OptimizerRequest, QuarterlyAllocator, QuarterlyPayments,
    SafeHarborSummary, TableKey, TaxCalculator, TaxInput, TaxTableRegistry, TaxYearConfig,
};

fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

#[test]
fn golden_household_flows_into_quarterly_plan() {
    let _guard = init_test_tracing();
    let config = TaxYearConfig::mfj_2025();

    let input = TaxInput::new(dec!(450000)).with_pretax_401k(dec!(23500));
    input.validate().unwrap();
    let breakdown = TaxCalculator::new(&config).total_tax(&input);

    assert_eq!(breakdown.federal_tax, dec!(81006.00));
    assert_eq!(breakdown.california_tax, dec!(31735.87));
    assert_eq!(breakdown.oklahoma_tax, dec!(0.00));
    assert_eq!(breakdown.fica_tax, dec!(19243.20));
    assert_eq!(breakdown.total_tax, dec!(131985.07));
    assert_eq!(breakdown.effective_rate, dec!(29.33));

    let allocator = QuarterlyAllocator::new(&config);
    let allocation = allocator.quarterly_estimate(&breakdown, dec!(0));
    assert_eq!(allocation.annual_target, dec!(101467.68));

    let mut payments = QuarterlyPayments::new();
    payments.mark_paid(1, allocation.total_quarterly).unwrap();
    let installments = allocator.installments(&allocation, &payments);
    assert!(installments[0].paid);
    assert!(installments[1..].iter().all(|i| !i.paid));

    let summary = SafeHarborSummary::compute(
        &config.safe_harbor,
        breakdown.income_tax_liability(),
        dec!(90000),
        Some(dec!(420000)),
    );
    assert_eq!(summary.recommended_annual, dec!(99000.00));
}

#[test]
fn marginal_and_optimizer_use_same_config() {
    let config = TaxYearConfig::mfj_2025();

    let rates = MarginalRateResolver::new(&config).marginal_rates(dec!(450000));
    let result = ContributionOptimizer::new(&config.retirement).optimize(&OptimizerRequest {
        current_contribution_percent: dec!(5),
        annual_salary: dec!(200000),
        ytd_contribution: dec!(10000),
        remaining_pay_periods: 13,
        age: Some(55),
    });

    assert_eq!(rates.combined, dec!(0.4365));
    assert_eq!(result.max_contribution, dec!(31000));
    assert_eq!(result.remaining_contribution_room, dec!(21000.00));
    assert_eq!(result.recommended_percent, dec!(21.0));
}

#[test]
fn registry_override_changes_results_without_code_changes() {
    let flat_federal = BracketTable::new(vec![Bracket::top(dec!(0.20))]).unwrap();
    let mut registry = TaxTableRegistry::with_builtin_tables();
    registry.register(
        TableKey::new(2025, Jurisdiction::Federal, FilingStatusCode::MarriedFilingJointly),
        flat_federal,
    );

    let config = TaxYearConfig::mfj_2025().with_registry_tables(&registry);
    let breakdown = TaxCalculator::new(&config)
        .total_tax(&TaxInput::new(dec!(450000)).with_pretax_401k(dec!(23500)));

    // 20% of 396,500 taxable
    assert_eq!(breakdown.federal_tax, dec!(79300.00));
    assert_eq!(breakdown.california_tax, dec!(31735.87));
}

#[test]
fn builtin_registry_tables_match_config_tables() {
    let registry = TaxTableRegistry::with_builtin_tables();
    let config = TaxYearConfig::mfj_2025();

    for jurisdiction in Jurisdiction::ALL {
        let key = TableKey::new(2025, jurisdiction, FilingStatusCode::MarriedFilingJointly);
        let table = registry.get(&key).unwrap();

        assert_eq!(table, &config.schedule(jurisdiction).brackets);
    }

    assert_eq!(bracket_tax(dec!(23850), &config.federal.brackets), dec!(2385.00));
}
