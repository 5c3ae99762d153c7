use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::round_half_up;
use crate::models::{SafeHarborConfig, SafeHarborOption, SafeHarborSummary};

const QUARTERS: Decimal = dec!(4);

fn option(
    factor: Decimal,
    base: Decimal,
) -> SafeHarborOption {
    let annual = base * factor;
    SafeHarborOption {
        factor,
        annual: round_half_up(annual),
        quarterly: round_half_up(annual / QUARTERS),
    }
}

impl SafeHarborSummary {
    /// Compares the prior-year and current-year safe-harbor methods.
    ///
    /// A missing or zero `prior_year_agi` is treated as high income, which
    /// selects the stricter prior-year factor.
    pub fn compute(
        config: &SafeHarborConfig,
        current_year_tax: Decimal,
        prior_year_tax: Decimal,
        prior_year_agi: Option<Decimal>,
    ) -> Self {
        let high_income_taxpayer = match prior_year_agi {
            Some(agi) if !agi.is_zero() => agi > config.high_income_agi_threshold,
            _ => true,
        };
        let prior_factor = if high_income_taxpayer {
            config.high_income_prior_year_factor
        } else {
            config.prior_year_factor
        };

        let prior_year_method = option(prior_factor, prior_year_tax);
        let current_year_method = option(config.current_year_factor, current_year_tax);
        let minimum = (prior_year_tax * prior_factor).min(current_year_tax * config.current_year_factor);

        Self {
            prior_year_method,
            current_year_method,
            recommended_annual: round_half_up(minimum),
            recommended_quarterly: round_half_up(minimum / QUARTERS),
            high_income_taxpayer,
        }
    }
}
