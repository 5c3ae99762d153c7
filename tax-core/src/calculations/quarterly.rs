//! Estimated tax payments under the safe-harbor rules.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::common::{round_half_up, safe_ratio};
use crate::models::{
    QuarterlyAllocation, QuarterlyInstallment, QuarterlyPayments, TaxBreakdown, TaxYearConfig,
};

const QUARTERS: Decimal = dec!(4);

/// Splits the safe-harbor minimum into four equal installments and
/// apportions each one across jurisdictions.
#[derive(Debug, Clone, Copy)]
pub struct QuarterlyAllocator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> QuarterlyAllocator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Minimum quarterly payment for the year in `breakdown`.
    ///
    /// The target is the smaller of 110% of `prior_year_tax` and 90% of this
    /// year's income tax (FICA excluded). With no prior-year figure the
    /// current-year method is used alone.
    pub fn quarterly_estimate(
        &self,
        breakdown: &TaxBreakdown,
        prior_year_tax: Decimal,
    ) -> QuarterlyAllocation {
        let safe_harbor = &self.config.safe_harbor;
        let total_liability = breakdown.income_tax_liability();

        let current = total_liability * safe_harbor.current_year_factor;
        let annual_target = if prior_year_tax > Decimal::ZERO {
            let prior = prior_year_tax * safe_harbor.high_income_prior_year_factor;
            prior.min(current)
        } else {
            current
        };
        debug!(%total_liability, %annual_target, "safe-harbor target");

        let shares = safe_harbor.fallback_shares;
        let (federal_share, california_share, oklahoma_share) = if total_liability > Decimal::ZERO {
            (
                safe_ratio(breakdown.federal_tax, total_liability, shares.federal),
                safe_ratio(breakdown.california_tax, total_liability, shares.california),
                safe_ratio(breakdown.oklahoma_tax, total_liability, shares.oklahoma),
            )
        } else {
            (shares.federal, shares.california, shares.oklahoma)
        };

        let quarterly = annual_target / QUARTERS;

        QuarterlyAllocation {
            total_quarterly: round_half_up(quarterly),
            federal_quarterly: round_half_up(quarterly * federal_share),
            california_quarterly: round_half_up(quarterly * california_share),
            oklahoma_quarterly: round_half_up(quarterly * oklahoma_share),
            annual_target: round_half_up(annual_target),
        }
    }

    /// The four installments with this year's due dates and whatever has
    /// been recorded as paid.
    pub fn installments(
        &self,
        allocation: &QuarterlyAllocation,
        payments: &QuarterlyPayments,
    ) -> Vec<QuarterlyInstallment> {
        (1u8..=4)
            .zip(self.config.quarterly_due_dates)
            .map(|(quarter, due_date)| {
                let paid_amount = payments.paid_amount(quarter);
                QuarterlyInstallment {
                    quarter,
                    due_date,
                    federal_amount: allocation.federal_quarterly,
                    california_amount: allocation.california_quarterly,
                    oklahoma_amount: allocation.oklahoma_quarterly,
                    total_amount: allocation.total_quarterly,
                    paid: paid_amount.is_some(),
                    paid_amount,
                }
            })
            .collect()
    }
}
