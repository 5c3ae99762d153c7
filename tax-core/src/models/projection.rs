use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax_breakdown::TaxBreakdown;

/// Overrides applied when projecting the year from paystub totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectionOptions {
    /// Replaces the YTD-derived gross income.
    pub annual_income: Option<Decimal>,
    /// Replaces the extrapolated 401(k) deferral.
    pub pretax_401k: Option<Decimal>,
    pub oklahoma_income: Decimal,
}

/// Full-year liability compared with what has been withheld so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProjection {
    pub breakdown: TaxBreakdown,
    pub pretax_401k: Decimal,
    pub withheld_ytd: Decimal,
    pub projected_liability: Decimal,
    /// Positive means a refund, negative means a balance due.
    pub refund_or_owed: Decimal,
}

impl fmt::Display for TaxProjection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", self.breakdown)?;
        writeln!(f, "401(k) assumed:      {:>14}", self.pretax_401k)?;
        writeln!(f, "Withheld YTD:        {:>14}", self.withheld_ytd)?;
        writeln!(f, "Projected liability: {:>14}", self.projected_liability)?;
        if self.refund_or_owed >= Decimal::ZERO {
            write!(f, "Projected refund:    {:>14}", self.refund_or_owed)
        } else {
            write!(f, "Projected owed:      {:>14}", -self.refund_or_owed)
        }
    }
}
