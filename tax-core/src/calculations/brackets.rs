//! Progressive bracket arithmetic.

use rust_decimal::Decimal;

use crate::models::BracketTable;

/// Tax on `income` under a progressive schedule. Unrounded.
///
/// Each bracket taxes the slice of income between the previous limit and its
/// own. Income exactly at a limit fills that bracket and contributes nothing
/// to the next one.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::brackets::bracket_tax;
/// use tax_core::tables::mfj_2025;
///
/// assert_eq!(bracket_tax(dec!(23850), &mfj_2025::federal_brackets()), dec!(2385.00));
/// ```
pub fn bracket_tax(
    income: Decimal,
    table: &BracketTable,
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut prev_limit = Decimal::ZERO;

    for bracket in table.brackets() {
        if income <= prev_limit {
            break;
        }
        match bracket.upper_limit {
            Some(limit) => {
                tax += (income.min(limit) - prev_limit) * bracket.rate;
                prev_limit = limit;
            }
            None => {
                tax += (income - prev_limit) * bracket.rate;
                break;
            }
        }
    }

    tax
}

/// Rate of the bracket the next dollar above `taxable` falls into.
///
/// This is the last bracket whose lower bound is strictly below `taxable`, or
/// the first bracket when `taxable` is zero.
pub fn marginal_rate(
    taxable: Decimal,
    table: &BracketTable,
) -> Decimal {
    table
        .ranges()
        .take_while(|(lower, _, _)| *lower < taxable)
        .last()
        .map(|(_, _, rate)| rate)
        .unwrap_or_else(|| table.base_rate())
}
