use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("quarter must be 1-4, got {0}")]
    InvalidQuarter(u8),

    #[error("payment amount must not be negative, got {0}")]
    NegativePayment(Decimal),
}

fn check_quarter(quarter: u8) -> Result<(), ScheduleError> {
    if !(1..=4).contains(&quarter) {
        return Err(ScheduleError::InvalidQuarter(quarter));
    }
    Ok(())
}

/// Minimum estimated payment per quarter, split by jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyAllocation {
    pub total_quarterly: Decimal,
    pub federal_quarterly: Decimal,
    pub california_quarterly: Decimal,
    pub oklahoma_quarterly: Decimal,
    /// Safe-harbor amount for the whole year.
    pub annual_target: Decimal,
}

impl fmt::Display for QuarterlyAllocation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Annual safe-harbor target: {:>12}", self.annual_target)?;
        writeln!(f, "Per quarter:               {:>12}", self.total_quarterly)?;
        writeln!(f, "  Federal:                 {:>12}", self.federal_quarterly)?;
        writeln!(f, "  California:              {:>12}", self.california_quarterly)?;
        write!(f, "  Oklahoma:                {:>12}", self.oklahoma_quarterly)
    }
}

/// Payments the household has recorded against each quarter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyPayments {
    paid: BTreeMap<u8, Decimal>,
}

impl QuarterlyPayments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `amount` as paid for `quarter`, replacing any earlier record.
    pub fn mark_paid(
        &mut self,
        quarter: u8,
        amount: Decimal,
    ) -> Result<(), ScheduleError> {
        check_quarter(quarter)?;
        if amount < Decimal::ZERO {
            return Err(ScheduleError::NegativePayment(amount));
        }
        self.paid.insert(quarter, amount);
        Ok(())
    }

    /// Clears the paid record for `quarter`. Returns the amount that was
    /// recorded, if any.
    pub fn unmark(
        &mut self,
        quarter: u8,
    ) -> Result<Option<Decimal>, ScheduleError> {
        check_quarter(quarter)?;
        Ok(self.paid.remove(&quarter))
    }

    pub fn paid_amount(
        &self,
        quarter: u8,
    ) -> Option<Decimal> {
        self.paid.get(&quarter).copied()
    }

    pub fn total_paid(&self) -> Decimal {
        self.paid.values().copied().sum()
    }
}

/// One row of the estimated-payment calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyInstallment {
    pub quarter: u8,
    pub due_date: NaiveDate,
    pub federal_amount: Decimal,
    pub california_amount: Decimal,
    pub oklahoma_amount: Decimal,
    pub total_amount: Decimal,
    pub paid: bool,
    pub paid_amount: Option<Decimal>,
}

impl fmt::Display for QuarterlyInstallment {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let status = match self.paid_amount {
            Some(amount) => format!("paid {amount}"),
            None => "unpaid".to_string(),
        };
        write!(
            f,
            "Q{} due {}  federal {:>10}  CA {:>10}  OK {:>8}  total {:>10}  [{}]",
            self.quarter,
            self.due_date.format("%Y-%m-%d"),
            self.federal_amount,
            self.california_amount,
            self.oklahoma_amount,
            self.total_amount,
            status
        )
    }
}

/// One way of meeting the safe harbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeHarborOption {
    /// Multiplier applied to the base liability (1.10 means 110%).
    pub factor: Decimal,
    pub annual: Decimal,
    pub quarterly: Decimal,
}

/// Both safe-harbor methods side by side, and the smaller of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeHarborSummary {
    pub prior_year_method: SafeHarborOption,
    pub current_year_method: SafeHarborOption,
    pub recommended_annual: Decimal,
    pub recommended_quarterly: Decimal,
    pub high_income_taxpayer: bool,
}

impl fmt::Display for SafeHarborSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let pct = |factor: Decimal| (factor * Decimal::ONE_HUNDRED).normalize();
        writeln!(
            f,
            "Prior-year method ({}%):   {:>12} ({} per quarter)",
            pct(self.prior_year_method.factor),
            self.prior_year_method.annual,
            self.prior_year_method.quarterly
        )?;
        writeln!(
            f,
            "Current-year method ({}%):  {:>12} ({} per quarter)",
            pct(self.current_year_method.factor),
            self.current_year_method.annual,
            self.current_year_method.quarterly
        )?;
        writeln!(
            f,
            "Recommended minimum:        {:>12} ({} per quarter)",
            self.recommended_annual, self.recommended_quarterly
        )?;
        write!(f, "High-income taxpayer:       {}", self.high_income_taxpayer)
    }
}
