//! Federal, California and Oklahoma income tax.

use rust_decimal::Decimal;
use tracing::debug;

use super::brackets::bracket_tax;
use super::common::non_negative;
use crate::models::{IncomeTaxSchedule, TaxYearConfig};

/// Per-jurisdiction income tax. Results are unrounded so the aggregator can
/// round once at the end.
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Federal tax on `gross − 401(k) − standard deduction`.
    pub fn federal_tax(
        &self,
        gross_income: Decimal,
        pretax_401k: Decimal,
    ) -> Decimal {
        let taxable = self.taxable_income(&self.config.federal, gross_income, pretax_401k);
        debug!(%taxable, "federal taxable income");
        bracket_tax(taxable, &self.config.federal.brackets)
    }

    /// California tax plus the Mental Health Services surtax.
    pub fn california_tax(
        &self,
        gross_income: Decimal,
        pretax_401k: Decimal,
    ) -> Decimal {
        let taxable = self.taxable_income(&self.config.california, gross_income, pretax_401k);
        debug!(%taxable, "california taxable income");
        bracket_tax(taxable, &self.config.california.brackets) + self.surtax(taxable)
    }

    /// Oklahoma tax on Oklahoma-sourced income only.
    ///
    /// The 401(k) deferral is not apportioned to Oklahoma income, so a
    /// household with both deferrals and Oklahoma income is slightly
    /// overtaxed here.
    pub fn oklahoma_tax(
        &self,
        oklahoma_income: Decimal,
    ) -> Decimal {
        if oklahoma_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let schedule = &self.config.oklahoma;
        let taxable = non_negative(oklahoma_income - schedule.standard_deduction);
        debug!(%taxable, "oklahoma taxable income");
        bracket_tax(taxable, &schedule.brackets)
    }

    fn taxable_income(
        &self,
        schedule: &IncomeTaxSchedule,
        gross_income: Decimal,
        pretax_401k: Decimal,
    ) -> Decimal {
        non_negative(gross_income - pretax_401k - schedule.standard_deduction)
    }

    fn surtax(
        &self,
        taxable: Decimal,
    ) -> Decimal {
        let surtax = &self.config.california_surtax;
        if taxable > surtax.threshold {
            (taxable - surtax.threshold) * surtax.rate
        } else {
            Decimal::ZERO
        }
    }
}
