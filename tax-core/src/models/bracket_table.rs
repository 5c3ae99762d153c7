use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors raised while building a [`BracketTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table has no brackets")]
    Empty,

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    #[error("last bracket must be unbounded, got upper limit {limit}")]
    MissingTopBracket { limit: Decimal },

    #[error("bracket {index} upper limit {limit} must exceed the previous limit {previous}")]
    NonIncreasingLimit {
        index: usize,
        limit: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },
}

/// One row of a progressive schedule: income up to `upper_limit` is taxed at
/// `rate`. `None` marks the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl Bracket {
    pub fn new(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    pub fn top(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }
}

/// An ordered, validated progressive schedule.
///
/// Limits partition `[0, ∞)` into contiguous ranges: each bracket starts where
/// the previous one ended and the last bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bracket>", into = "Vec<Bracket>")]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Validates and wraps `brackets`.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the table is empty, if any bracket but
    /// the last is unbounded, if the last is bounded, if limits are not
    /// positive and strictly increasing, or if a rate lies outside `[0, 1]`.
    /// Decreasing rates are accepted with a warning.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last = brackets.len() - 1;
        let mut previous = Decimal::ZERO;
        let mut previous_rate: Option<Decimal> = None;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            if let Some(prev_rate) = previous_rate {
                if bracket.rate < prev_rate {
                    warn!(
                        index,
                        rate = %bracket.rate,
                        previous_rate = %prev_rate,
                        "bracket rate decreases; schedule is not progressive"
                    );
                }
            }
            previous_rate = Some(bracket.rate);

            match bracket.upper_limit {
                Some(limit) if index == last => {
                    return Err(BracketTableError::MissingTopBracket { limit });
                }
                Some(limit) => {
                    if limit <= previous {
                        return Err(BracketTableError::NonIncreasingLimit {
                            index,
                            limit,
                            previous,
                        });
                    }
                    previous = limit;
                }
                None if index != last => {
                    return Err(BracketTableError::UnboundedBeforeEnd { index });
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Wraps a table whose shape is fixed at compile time. Built-in tables
    /// are checked against [`BracketTable::new`] in tests.
    pub(crate) fn from_static(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Rate of the first bracket.
    pub fn base_rate(&self) -> Decimal {
        self.brackets
            .first()
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Iterates `(lower_bound, upper_limit, rate)` for each bracket.
    pub fn ranges(&self) -> impl Iterator<Item = (Decimal, Option<Decimal>, Decimal)> + '_ {
        let mut lower = Decimal::ZERO;
        self.brackets.iter().map(move |bracket| {
            let start = lower;
            if let Some(limit) = bracket.upper_limit {
                lower = limit;
            }
            (start, bracket.upper_limit, bracket.rate)
        })
    }
}

impl TryFrom<Vec<Bracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<Bracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<Bracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

impl fmt::Display for BracketTable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (lower, upper, rate) in self.ranges() {
            let pct = (rate * Decimal::ONE_HUNDRED).normalize();
            match upper {
                Some(upper) => writeln!(f, "  {lower:>12} – {upper:<12} {pct:>6}%")?,
                None => writeln!(f, "  {lower:>12} and above    {pct:>6}%")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn three_brackets() -> Vec<Bracket> {
        vec![
            Bracket::new(dec!(10000), dec!(0.10)),
            Bracket::new(dec!(40000), dec!(0.20)),
            Bracket::top(dec!(0.30)),
        ]
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn new_accepts_well_formed_table() {
        let table = BracketTable::new(three_brackets()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.base_rate(), dec!(0.10));
    }

    #[test]
    fn new_rejects_empty_table() {
        assert_eq!(BracketTable::new(vec![]), Err(BracketTableError::Empty));
    }

    #[test]
    fn new_rejects_bounded_last_bracket() {
        let result = BracketTable::new(vec![Bracket::new(dec!(10000), dec!(0.10))]);

        assert_eq!(
            result,
            Err(BracketTableError::MissingTopBracket {
                limit: dec!(10000)
            })
        );
    }

    #[test]
    fn new_rejects_unbounded_middle_bracket() {
        let result = BracketTable::new(vec![
            Bracket::top(dec!(0.10)),
            Bracket::top(dec!(0.20)),
        ]);

        assert_eq!(result, Err(BracketTableError::UnboundedBeforeEnd { index: 0 }));
    }

    #[test]
    fn new_rejects_non_increasing_limits() {
        let result = BracketTable::new(vec![
            Bracket::new(dec!(10000), dec!(0.10)),
            Bracket::new(dec!(10000), dec!(0.20)),
            Bracket::top(dec!(0.30)),
        ]);

        assert_eq!(
            result,
            Err(BracketTableError::NonIncreasingLimit {
                index: 1,
                limit: dec!(10000),
                previous: dec!(10000),
            })
        );
    }

    #[test]
    fn new_rejects_zero_first_limit() {
        let result = BracketTable::new(vec![
            Bracket::new(dec!(0), dec!(0.10)),
            Bracket::top(dec!(0.20)),
        ]);

        assert!(matches!(
            result,
            Err(BracketTableError::NonIncreasingLimit { index: 0, .. })
        ));
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = BracketTable::new(vec![Bracket::top(dec!(1.5))]);

        assert_eq!(
            result,
            Err(BracketTableError::InvalidRate {
                index: 0,
                rate: dec!(1.5)
            })
        );
    }

    #[test]
    fn new_accepts_decreasing_rates() {
        let _guard = init_test_tracing();
        let result = BracketTable::new(vec![
            Bracket::new(dec!(10000), dec!(0.20)),
            Bracket::top(dec!(0.10)),
        ]);

        assert!(result.is_ok());
    }

    // =========================================================================
    // ranges tests
    // =========================================================================

    #[test]
    fn ranges_yield_contiguous_lower_bounds() {
        let table = BracketTable::new(three_brackets()).unwrap();

        let ranges: Vec<_> = table.ranges().collect();

        assert_eq!(
            ranges,
            vec![
                (dec!(0), Some(dec!(10000)), dec!(0.10)),
                (dec!(10000), Some(dec!(40000)), dec!(0.20)),
                (dec!(40000), None, dec!(0.30)),
            ]
        );
    }
}
