use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::format_percent;

/// Social security and Medicare owed by the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaComponents {
    pub social_security_tax: Decimal,
    /// Flat Medicare plus additional Medicare tax.
    pub medicare_tax: Decimal,
}

impl FicaComponents {
    pub fn total(&self) -> Decimal {
        self.social_security_tax + self.medicare_tax
    }
}

/// Annual liability across every jurisdiction. Money fields are rounded to
/// cents; `effective_rate` is a percentage rounded to two places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub gross_income: Decimal,
    pub federal_tax: Decimal,
    /// California tax after the credit for tax paid to Oklahoma.
    pub california_tax: Decimal,
    pub oklahoma_tax: Decimal,
    pub fica_tax: Decimal,
    pub total_tax: Decimal,
    pub effective_rate: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_tax: Decimal,
}

impl TaxBreakdown {
    /// Federal + California + Oklahoma, excluding payroll taxes.
    pub fn income_tax_liability(&self) -> Decimal {
        self.federal_tax + self.california_tax + self.oklahoma_tax
    }
}

impl fmt::Display for TaxBreakdown {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Gross income:        {:>14}", self.gross_income)?;
        writeln!(f, "Federal tax:         {:>14}", self.federal_tax)?;
        writeln!(f, "California tax:      {:>14}", self.california_tax)?;
        writeln!(f, "Oklahoma tax:        {:>14}", self.oklahoma_tax)?;
        writeln!(f, "FICA tax:            {:>14}", self.fica_tax)?;
        writeln!(f, "  Social security:   {:>14}", self.social_security_tax)?;
        writeln!(f, "  Medicare:          {:>14}", self.medicare_tax)?;
        writeln!(f, "Total tax:           {:>14}", self.total_tax)?;
        write!(f, "Effective rate:      {:>13}%", self.effective_rate)
    }
}

/// Rate applied to the next dollar of income in each jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalRates {
    pub federal: Decimal,
    pub california: Decimal,
    pub fica: Decimal,
    pub combined: Decimal,
}

impl fmt::Display for MarginalRates {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Federal:    {:>7}", format_percent(self.federal, 1))?;
        writeln!(f, "California: {:>7}", format_percent(self.california, 2))?;
        writeln!(f, "FICA:       {:>7}", format_percent(self.fica, 2))?;
        write!(f, "Combined:   {:>7}", format_percent(self.combined, 1))
    }
}
