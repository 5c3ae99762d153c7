use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shares from one grant released on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsuVestingEvent {
    pub grant_id: String,
    pub symbol: String,
    pub grant_date: NaiveDate,
    pub vesting_date: NaiveDate,
    pub shares_vesting: u64,
    /// Fair market value per share on the vesting date.
    pub fmv_at_vest: Decimal,
}

impl RsuVestingEvent {
    /// Ordinary income recognised at vest.
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.shares_vesting) * self.fmv_at_vest
    }
}

impl fmt::Display for RsuVestingEvent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{}  {:<6} {:<12} {:>8} sh @ {:>10} = {:>12}",
            self.vesting_date.format("%Y-%m-%d"),
            self.symbol,
            self.grant_id,
            self.shares_vesting,
            self.fmv_at_vest,
            self.total_value()
        )
    }
}

/// Snapshot of a vesting schedule relative to one date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VestingSummary {
    pub as_of: NaiveDate,
    pub total_grants: usize,
    pub total_shares_granted: u64,
    pub total_shares_vested: u64,
    pub total_shares_pending: u64,
    /// Soonest first.
    pub upcoming_vests: Vec<RsuVestingEvent>,
    /// Most recent first.
    pub past_vests: Vec<RsuVestingEvent>,
}

impl fmt::Display for VestingSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "As of {}", self.as_of.format("%Y-%m-%d"))?;
        writeln!(f, "Grants:          {:>10}", self.total_grants)?;
        writeln!(f, "Shares granted:  {:>10}", self.total_shares_granted)?;
        writeln!(f, "Shares vested:   {:>10}", self.total_shares_vested)?;
        writeln!(f, "Shares pending:  {:>10}", self.total_shares_pending)?;
        writeln!(f, "Upcoming vests:")?;
        for event in &self.upcoming_vests {
            writeln!(f, "  {event}")?;
        }
        writeln!(f, "Recent vests:")?;
        for event in &self.past_vests {
            writeln!(f, "  {event}")?;
        }
        Ok(())
    }
}
