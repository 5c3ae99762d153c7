use rust_decimal::Decimal;
use tracing::debug;

use super::common::round_half_up;
use super::total::TaxCalculator;
use crate::models::{ProjectionOptions, TaxInput, TaxProjection, TaxYearConfig, YtdTotals};

/// Projects full-year liability from year-to-date paystub totals and
/// compares it with withholding.
#[derive(Debug, Clone, Copy)]
pub struct TaxProjector<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> TaxProjector<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn project(
        &self,
        ytd: &YtdTotals,
        options: &ProjectionOptions,
    ) -> TaxProjection {
        let gross_income = options
            .annual_income
            .unwrap_or(ytd.gross_income + ytd.rsu_income);
        let pretax_401k = options
            .pretax_401k
            .unwrap_or_else(|| self.projected_deferral(ytd.pretax_401k));
        debug!(%gross_income, %pretax_401k, "projection inputs");

        let input = TaxInput::new(gross_income)
            .with_pretax_401k(pretax_401k)
            .with_oklahoma_income(options.oklahoma_income)
            .with_rsu_income(ytd.rsu_income);
        let breakdown = TaxCalculator::new(self.config).total_tax(&input);

        let withheld_ytd = ytd.total_withheld();
        let projected_liability = breakdown.total_tax;

        TaxProjection {
            breakdown,
            pretax_401k,
            withheld_ytd,
            projected_liability,
            refund_or_owed: round_half_up(withheld_ytd - projected_liability),
        }
    }

    /// Doubles the YTD deferral when there is one, else assumes the full
    /// elective limit.
    fn projected_deferral(
        &self,
        ytd_deferral: Decimal,
    ) -> Decimal {
        if ytd_deferral.is_zero() {
            self.config.retirement.elective_deferral_limit
        } else {
            ytd_deferral * Decimal::TWO
        }
    }
}
