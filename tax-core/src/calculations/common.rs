//! Rounding and arithmetic helpers shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage to one decimal place, half-up.
pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a fractional rate (`0.24`) as a percentage string (`"24.0%"`)
/// with exactly `decimals` places.
pub fn format_percent(
    rate: Decimal,
    decimals: u32,
) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, pct)
}

/// Clamps negative values to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// `numerator / denominator`, or `fallback` when the division is undefined.
pub fn safe_ratio(
    numerator: Decimal,
    denominator: Decimal,
    fallback: Decimal,
) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(31735.875)), dec!(31735.88));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // percentage tests
    // =========================================================================

    #[test]
    fn round_percent_keeps_one_place() {
        assert_eq!(round_percent(dec!(20.95)), dec!(21.0));
        assert_eq!(round_percent(dec!(20.94)), dec!(20.9));
    }

    #[test]
    fn format_percent_pads_to_requested_places() {
        assert_eq!(format_percent(dec!(0.1), 2), "10.00%");
        assert_eq!(format_percent(dec!(0.24), 1), "24.0%");
        assert_eq!(format_percent(dec!(0.3565), 1), "35.7%");
    }

    // =========================================================================
    // non_negative / safe_ratio tests
    // =========================================================================

    #[test]
    fn non_negative_clamps_below_zero() {
        assert_eq!(non_negative(dec!(-0.01)), dec!(0));
        assert_eq!(non_negative(dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn safe_ratio_divides() {
        assert_eq!(safe_ratio(dec!(40000), dec!(400000), dec!(0)), dec!(0.1));
    }

    #[test]
    fn safe_ratio_returns_fallback_for_zero_denominator() {
        assert_eq!(safe_ratio(dec!(5), dec!(0), dec!(0.6)), dec!(0.6));
    }
}
