//! Employee payroll tax.

use rust_decimal::Decimal;

use crate::models::{FicaComponents, FicaConfig};

/// Social security and Medicare on gross wages. The 401(k) deferral does not
/// reduce FICA wages.
#[derive(Debug, Clone, Copy)]
pub struct FicaCalculator<'a> {
    config: &'a FicaConfig,
}

impl<'a> FicaCalculator<'a> {
    pub fn new(config: &'a FicaConfig) -> Self {
        Self { config }
    }

    pub fn fica_tax(
        &self,
        gross_income: Decimal,
    ) -> FicaComponents {
        FicaComponents {
            social_security_tax: self.social_security_tax(gross_income),
            medicare_tax: self.medicare_tax(gross_income),
        }
    }

    fn social_security_tax(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        gross_income.min(self.config.ss_wage_base) * self.config.ss_rate
    }

    fn medicare_tax(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        let mut tax = gross_income * self.config.medicare_rate;
        if gross_income > self.config.additional_medicare_threshold {
            tax += (gross_income - self.config.additional_medicare_threshold)
                * self.config.additional_medicare_rate;
        }
        tax
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::TaxYearConfig;

    fn fica() -> FicaConfig {
        TaxYearConfig::mfj_2025().fica
    }

    #[test]
    fn social_security_reaches_cap_at_wage_base() {
        let config = fica();
        let calc = FicaCalculator::new(&config);

        assert_eq!(calc.fica_tax(dec!(176100)).social_security_tax, dec!(10918.20));
    }

    #[test]
    fn social_security_is_flat_above_wage_base() {
        let config = fica();
        let calc = FicaCalculator::new(&config);

        assert_eq!(
            calc.fica_tax(dec!(176101)).social_security_tax,
            calc.fica_tax(dec!(176100)).social_security_tax
        );
    }

    #[test]
    fn medicare_has_no_surtax_at_threshold() {
        let config = fica();
        let calc = FicaCalculator::new(&config);

        assert_eq!(calc.fica_tax(dec!(250000)).medicare_tax, dec!(3625.00));
    }

    #[test]
    fn medicare_adds_surtax_above_threshold() {
        let config = fica();
        let calc = FicaCalculator::new(&config);

        let fica = calc.fica_tax(dec!(450000));

        assert_eq!(fica.medicare_tax, dec!(8325.00));
        assert_eq!(fica.total(), dec!(19243.20));
    }

    #[test]
    fn zero_wages_owe_nothing() {
        let config = fica();
        let calc = FicaCalculator::new(&config);

        assert_eq!(calc.fica_tax(dec!(0)).total(), dec!(0));
    }
}
