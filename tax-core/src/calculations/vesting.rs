use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{RsuVestingEvent, VestingSummary};

const UPCOMING_WINDOW_DAYS: i64 = 180;
const RECENT_WINDOW_DAYS: i64 = 365;
const MAX_LISTED: usize = 10;

impl VestingSummary {
    /// Summarises `events` as seen on `as_of`.
    ///
    /// An event counts as vested once its vesting date is strictly before
    /// `as_of`; a vest dated `as_of` is still pending.
    pub fn build(
        events: &[RsuVestingEvent],
        as_of: NaiveDate,
    ) -> Self {
        let total_grants = events
            .iter()
            .map(|e| e.grant_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let (past, future): (Vec<_>, Vec<_>) = events.iter().partition(|e| e.vesting_date < as_of);

        let horizon = as_of + Duration::days(UPCOMING_WINDOW_DAYS);
        let mut upcoming_vests: Vec<RsuVestingEvent> = future
            .iter()
            .filter(|e| e.vesting_date <= horizon)
            .map(|&e| e.clone())
            .collect();
        upcoming_vests.sort_by_key(|e| e.vesting_date);
        upcoming_vests.truncate(MAX_LISTED);

        let cutoff = as_of - Duration::days(RECENT_WINDOW_DAYS);
        let mut past_vests: Vec<RsuVestingEvent> = past
            .iter()
            .filter(|e| e.vesting_date >= cutoff)
            .map(|&e| e.clone())
            .collect();
        past_vests.sort_by_key(|e| std::cmp::Reverse(e.vesting_date));
        past_vests.truncate(MAX_LISTED);

        Self {
            as_of,
            total_grants,
            total_shares_granted: events.iter().map(|e| e.shares_vesting).sum(),
            total_shares_vested: past.iter().map(|e| e.shares_vesting).sum(),
            total_shares_pending: future.iter().map(|e| e.shares_vesting).sum(),
            upcoming_vests,
            past_vests,
        }
    }
}

/// Ordinary income from every vest dated in calendar `year`.
pub fn vest_income_for_year(
    events: &[RsuVestingEvent],
    year: i32,
) -> Decimal {
    events
        .iter()
        .filter(|e| e.vesting_date.year() == year)
        .map(RsuVestingEvent::total_value)
        .sum()
}
