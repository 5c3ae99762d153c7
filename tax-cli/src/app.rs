//! Command runners. Each validates its inputs, calls the engine and returns
//! the report text for `main` to print.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tax_core::{
    ContributionOptimizer, MarginalRateResolver, OptimizerRequest, ProjectionOptions,
    MAX_AMOUNT, QuarterlyAllocator, QuarterlyPayments, SafeHarborSummary, ScenarioRequest,
    TaxBreakdown, TaxCalculator, TaxInput, TaxProjector, TaxTableRegistry, TaxYearConfig,
    VestingSummary, YtdTotals, calculations::vest_income_for_year,
};
use tax_data::{BracketTableLoader, paystubs, parse_vesting_csv, validate_vesting_schedule};
use tracing::{debug, info};

/// Parses a `QUARTER=AMOUNT` payment such as `2=25000`.
pub fn parse_payment(s: &str) -> Result<(u8, Decimal), String> {
    let (quarter, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected QUARTER=AMOUNT, got '{s}'"))?;
    let quarter = quarter
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("invalid quarter '{quarter}': {e}"))?;
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok((quarter, amount))
}

/// Tax parameters for the run plus the tables they were built from.
#[derive(Debug, Clone)]
pub struct Planner {
    registry: TaxTableRegistry,
    config: TaxYearConfig,
}

impl Planner {
    /// Built-in 2025 MFJ parameters, with bracket tables from `brackets`
    /// replacing the built-in ones where the file provides them.
    pub fn new(brackets: Option<&Path>) -> Result<Self> {
        let mut registry = TaxTableRegistry::with_builtin_tables();
        if let Some(path) = brackets {
            BracketTableLoader::load_from_file(&mut registry, path)
                .with_context(|| format!("failed to load bracket tables from {}", path.display()))?;
        }
        let config = TaxYearConfig::mfj_2025().with_registry_tables(&registry);
        Ok(Self { registry, config })
    }

    fn breakdown(
        &self,
        input: &TaxInput,
    ) -> Result<TaxBreakdown> {
        input.validate()?;
        Ok(TaxCalculator::new(&self.config).total_tax(input))
    }

    pub fn projection(
        &self,
        paystubs_path: &Path,
        options: &ProjectionOptions,
    ) -> Result<String> {
        if let Some(income) = options.annual_income {
            ensure_amount("annual income", income)?;
        }
        if let Some(deferral) = options.pretax_401k {
            ensure_amount("pre-tax 401(k)", deferral)?;
        }
        ensure_amount("oklahoma income", options.oklahoma_income)?;

        let stubs = paystubs::load_from_file(paystubs_path)
            .with_context(|| format!("failed to load paystubs from {}", paystubs_path.display()))?;
        let ytd = YtdTotals::from_paystubs(&stubs);
        info!(paystubs = ytd.paystub_count, "aggregated paystubs");
        ensure_amount("year-to-date wages", ytd.gross_income + ytd.rsu_income)?;
        ensure_amount("year-to-date 401(k)", ytd.pretax_401k)?;
        ensure_amount("year-to-date withholding", ytd.total_withheld())?;

        let projection = TaxProjector::new(&self.config).project(&ytd, options);

        let mut out = String::new();
        writeln!(out, "Year to date")?;
        writeln!(out, "{ytd}")?;
        writeln!(out)?;
        writeln!(out, "Full-year projection")?;
        write!(out, "{projection}")?;
        Ok(out)
    }

    pub fn marginal(
        &self,
        gross_income: Decimal,
    ) -> Result<String> {
        ensure_amount("gross income", gross_income)?;
        let rates = MarginalRateResolver::new(&self.config).marginal_rates(gross_income);
        Ok(format!("Marginal rates at {gross_income}\n{rates}"))
    }

    pub fn quarterly(
        &self,
        input: &TaxInput,
        prior_year_tax: Decimal,
        paid: &[(u8, Decimal)],
    ) -> Result<String> {
        ensure_amount("prior-year tax", prior_year_tax)?;
        let mut payments = QuarterlyPayments::new();
        for &(quarter, amount) in paid {
            payments.mark_paid(quarter, amount)?;
        }

        let breakdown = self.breakdown(input)?;
        let allocator = QuarterlyAllocator::new(&self.config);
        let allocation = allocator.quarterly_estimate(&breakdown, prior_year_tax);
        let installments = allocator.installments(&allocation, &payments);
        debug!(paid = %payments.total_paid(), "recorded estimated payments");

        let mut out = String::new();
        writeln!(out, "{breakdown}")?;
        writeln!(out)?;
        writeln!(out, "{allocation}")?;
        writeln!(out)?;
        for installment in &installments {
            writeln!(out, "{installment}")?;
        }
        write!(out, "Paid so far: {}", payments.total_paid())?;
        Ok(out)
    }

    pub fn safe_harbor(
        &self,
        input: &TaxInput,
        prior_year_tax: Decimal,
        prior_year_agi: Option<Decimal>,
    ) -> Result<String> {
        ensure_amount("prior-year tax", prior_year_tax)?;
        if let Some(agi) = prior_year_agi {
            ensure_amount("prior-year AGI", agi)?;
        }

        let breakdown = self.breakdown(input)?;
        let summary = SafeHarborSummary::compute(
            &self.config.safe_harbor,
            breakdown.income_tax_liability(),
            prior_year_tax,
            prior_year_agi,
        );
        Ok(summary.to_string())
    }

    pub fn optimize(
        &self,
        request: &OptimizerRequest,
    ) -> Result<String> {
        request.validate(self.config.retirement.pay_periods_per_year)?;
        if request.remaining_pay_periods == 0 {
            bail!("remaining pay periods must be at least 1");
        }
        let result = ContributionOptimizer::new(&self.config.retirement).optimize(request);
        Ok(result.to_string())
    }

    pub fn scenario(
        &self,
        request: &ScenarioRequest,
    ) -> Result<String> {
        request.validate(self.config.retirement.pay_periods_per_year)?;
        let scenario = ContributionOptimizer::new(&self.config.retirement).scenario(request);
        Ok(scenario.to_string())
    }

    pub fn limits(
        &self,
        age: Option<u32>,
    ) -> String {
        let optimizer = ContributionOptimizer::new(&self.config.retirement);
        let mut out = optimizer.limits().to_string();
        if let Some(age) = age {
            out.push_str(&format!(
                "\nYour limit at age {age}: {}",
                optimizer.max_contribution(Some(age))
            ));
        }
        out
    }

    /// Every registered table, in key order.
    pub fn brackets(&self) -> Result<String> {
        let mut out = String::new();
        for key in self.registry.keys() {
            let table = self.registry.get(&key)?;
            writeln!(out, "{key}")?;
            write!(out, "{table}")?;
        }
        Ok(out)
    }
}

/// Vesting schedule report for `as_of`, with the RSU income of `as_of`'s
/// calendar year.
pub fn vesting_report(
    path: &Path,
    as_of: NaiveDate,
) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read vesting schedule at {}", path.display()))?;
    let events = parse_vesting_csv(&raw)
        .with_context(|| format!("invalid vesting schedule at {}", path.display()))?;
    let warnings = validate_vesting_schedule(&events);

    let summary = VestingSummary::build(&events, as_of);
    let year = as_of.year();

    let mut out = summary.to_string();
    writeln!(out, "RSU income {year}: {}", vest_income_for_year(&events, year))?;
    for warning in &warnings {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(out)
}

/// Non-negative and no larger than [`MAX_AMOUNT`].
fn ensure_amount(
    what: &str,
    value: Decimal,
) -> Result<()> {
    if value < Decimal::ZERO {
        bail!("{what} must not be negative, got {value}");
    }
    if value > MAX_AMOUNT {
        bail!("{what} exceeds the supported maximum of {MAX_AMOUNT}, got {value}");
    }
    Ok(())
}
