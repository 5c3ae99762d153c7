//! Whole-household liability across every jurisdiction.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::common::{non_negative, round_half_up, safe_ratio};
use super::fica::FicaCalculator;
use super::income_tax::IncomeTaxCalculator;
use crate::models::{TaxBreakdown, TaxInput, TaxYearConfig};

/// Runs every jurisdiction's calculator and combines the results.
///
/// California taxes worldwide income, so tax paid to Oklahoma on the same
/// income is credited against it. Money values are rounded half-up to cents
/// only after all arithmetic is done.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{TaxCalculator, TaxInput, TaxYearConfig};
///
/// let config = TaxYearConfig::mfj_2025();
/// let breakdown = TaxCalculator::new(&config)
///     .total_tax(&TaxInput::new(dec!(450000)).with_pretax_401k(dec!(23500)));
///
/// assert_eq!(breakdown.total_tax, dec!(131985.07));
/// assert_eq!(breakdown.effective_rate, dec!(29.33));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Computes the annual breakdown. Callers are expected to have run
    /// [`TaxInput::validate`] first; out-of-range inputs still produce a
    /// result rather than an error.
    pub fn total_tax(
        &self,
        input: &TaxInput,
    ) -> TaxBreakdown {
        if input.oklahoma_income > input.gross_income {
            warn!(
                oklahoma_income = %input.oklahoma_income,
                gross_income = %input.gross_income,
                "oklahoma income exceeds gross income"
            );
        }
        debug!(rsu_income = %input.rsu_income, "rsu income included in gross");

        let income_tax = IncomeTaxCalculator::new(self.config);
        let federal = income_tax.federal_tax(input.gross_income, input.pretax_401k);
        let california = income_tax.california_tax(input.gross_income, input.pretax_401k);
        let oklahoma = income_tax.oklahoma_tax(input.oklahoma_income);
        let fica = FicaCalculator::new(&self.config.fica).fica_tax(input.gross_income);

        let california = self.apply_multistate_credit(
            california,
            oklahoma,
            input.oklahoma_income,
            input.gross_income,
        );

        let total = federal + california + oklahoma + fica.total();
        let effective_rate = self.effective_rate(total, input.gross_income);

        TaxBreakdown {
            gross_income: input.gross_income,
            federal_tax: round_half_up(federal),
            california_tax: round_half_up(california),
            oklahoma_tax: round_half_up(oklahoma),
            fica_tax: round_half_up(fica.total()),
            total_tax: round_half_up(total),
            effective_rate,
            social_security_tax: round_half_up(fica.social_security_tax),
            medicare_tax: round_half_up(fica.medicare_tax),
        }
    }

    /// Credits Oklahoma tax against the California tax on the Oklahoma share
    /// of income, capped at the smaller of the two.
    fn apply_multistate_credit(
        &self,
        california_tax: Decimal,
        oklahoma_tax: Decimal,
        oklahoma_income: Decimal,
        gross_income: Decimal,
    ) -> Decimal {
        if oklahoma_income <= Decimal::ZERO || oklahoma_tax <= Decimal::ZERO {
            return california_tax;
        }

        let ratio = safe_ratio(oklahoma_income, gross_income, Decimal::ZERO);
        let california_on_oklahoma = california_tax * ratio;
        let credit = oklahoma_tax.min(california_on_oklahoma);
        debug!(%ratio, %credit, "applied california credit for oklahoma tax");

        non_negative(california_tax - credit)
    }

    /// Total as a percentage of gross, two places; zero for zero income.
    fn effective_rate(
        &self,
        total: Decimal,
        gross_income: Decimal,
    ) -> Decimal {
        if gross_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_half_up(safe_ratio(total, gross_income, Decimal::ZERO) * Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    fn config() -> TaxYearConfig {
        TaxYearConfig::mfj_2025()
    }

    // =========================================================================
    // total_tax tests
    // =========================================================================

    #[test]
    fn golden_household_without_oklahoma_income() {
        let config = config();
        let calc = TaxCalculator::new(&config);

        let breakdown = calc.total_tax(&TaxInput::new(dec!(450000)).with_pretax_401k(dec!(23500)));

        assert_eq!(
            breakdown,
            TaxBreakdown {
                gross_income: dec!(450000),
                federal_tax: dec!(81006.00),
                california_tax: dec!(31735.87),
                oklahoma_tax: dec!(0),
                fica_tax: dec!(19243.20),
                total_tax: dec!(131985.07),
                effective_rate: dec!(29.33),
                social_security_tax: dec!(10918.20),
                medicare_tax: dec!(8325.00),
            }
        );
    }

    #[test]
    fn zero_income_has_zero_effective_rate() {
        let config = config();
        let calc = TaxCalculator::new(&config);

        let breakdown = calc.total_tax(&TaxInput::new(dec!(0)));

        assert_eq!(breakdown.total_tax, dec!(0));
        assert_eq!(breakdown.effective_rate, dec!(0));
    }

    #[test]
    fn oklahoma_income_reduces_california_by_credit() {
        let config = config();
        let calc = TaxCalculator::new(&config);
        let base = calc.total_tax(&TaxInput::new(dec!(450000)).with_pretax_401k(dec!(23500)));

        let with_ok = calc.total_tax(
            &TaxInput::new(dec!(450000))
                .with_pretax_401k(dec!(23500))
                .with_oklahoma_income(dec!(40000)),
        );

        // CA on the OK share (31735.874 × 40000/450000 ≈ 2820.97) exceeds the
        // 832.50 OK tax, so the full OK tax is credited.
        assert_eq!(with_ok.oklahoma_tax, dec!(832.50));
        assert_eq!(with_ok.california_tax, dec!(30903.37));
        assert_eq!(with_ok.total_tax, base.total_tax);
    }

    #[test]
    fn credit_is_capped_at_california_tax_on_oklahoma_share() {
        let config = config();
        let calc = TaxCalculator::new(&config);

        let ca = dec!(1000);
        let credited = calc.apply_multistate_credit(ca, dec!(5000), dec!(100000), dec!(400000));

        assert_eq!(credited, dec!(750));
    }

    #[test]
    fn no_credit_without_oklahoma_tax() {
        let config = config();
        let calc = TaxCalculator::new(&config);

        let credited = calc.apply_multistate_credit(dec!(1000), dec!(0), dec!(10000), dec!(400000));

        assert_eq!(credited, dec!(1000));
    }

    #[test]
    fn credit_with_zero_gross_leaves_california_unchanged() {
        let config = config();
        let calc = TaxCalculator::new(&config);

        let credited = calc.apply_multistate_credit(dec!(1000), dec!(50), dec!(10000), dec!(0));

        assert_eq!(credited, dec!(1000));
    }

    // =========================================================================
    // property tests
    // =========================================================================

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_credit_never_makes_california_negative(
            gross in 0i64..3_000_000,
            ok_share_bp in 0i64..10_001,
            pretax in 0i64..31_000
        ) {
            let config = TaxYearConfig::mfj_2025();
            let calc = TaxCalculator::new(&config);
            let gross = Decimal::from(gross);
            let oklahoma = gross * Decimal::new(ok_share_bp, 4);
            let input = TaxInput::new(gross)
                .with_pretax_401k(Decimal::from(pretax).min(gross))
                .with_oklahoma_income(oklahoma);

            let breakdown = calc.total_tax(&input);

            prop_assert!(breakdown.california_tax >= Decimal::ZERO);
            prop_assert!(breakdown.total_tax >= Decimal::ZERO);
        }
    }
}
