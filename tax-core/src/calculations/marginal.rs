use rust_decimal::Decimal;

use super::brackets::marginal_rate;
use super::common::non_negative;
use crate::models::{FicaConfig, IncomeTaxSchedule, MarginalRates, TaxYearConfig};

/// Rate on the next dollar of wages.
///
/// The taxable base is gross income less the standard deduction; 401(k)
/// deferrals and the California surtax are not considered.
#[derive(Debug, Clone, Copy)]
pub struct MarginalRateResolver<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> MarginalRateResolver<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn marginal_rates(
        &self,
        gross_income: Decimal,
    ) -> MarginalRates {
        let federal = self.income_tax_rate(&self.config.federal, gross_income);
        let california = self.income_tax_rate(&self.config.california, gross_income);
        let fica = self.fica_rate(&self.config.fica, gross_income);

        MarginalRates {
            federal,
            california,
            fica,
            combined: federal + california + fica,
        }
    }

    fn income_tax_rate(
        &self,
        schedule: &IncomeTaxSchedule,
        gross_income: Decimal,
    ) -> Decimal {
        let taxable = non_negative(gross_income - schedule.standard_deduction);
        marginal_rate(taxable, &schedule.brackets)
    }

    fn fica_rate(
        &self,
        fica: &FicaConfig,
        gross_income: Decimal,
    ) -> Decimal {
        let mut rate = if gross_income < fica.ss_wage_base {
            fica.ss_rate + fica.medicare_rate
        } else {
            fica.medicare_rate
        };
        if gross_income > fica.additional_medicare_threshold {
            rate += fica.additional_medicare_rate;
        }
        rate
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn high_earner_rates() {
        let config = TaxYearConfig::mfj_2025();
        let resolver = MarginalRateResolver::new(&config);

        assert_eq!(
            resolver.marginal_rates(dec!(450000)),
            MarginalRates {
                federal: dec!(0.32),
                california: dec!(0.093),
                fica: dec!(0.0235),
                combined: dec!(0.4365),
            }
        );
    }

    #[test]
    fn below_wage_base_includes_social_security() {
        let config = TaxYearConfig::mfj_2025();
        let resolver = MarginalRateResolver::new(&config);

        let rates = resolver.marginal_rates(dec!(100000));

        assert_eq!(rates.federal, dec!(0.12));
        assert_eq!(rates.california, dec!(0.06));
        assert_eq!(rates.fica, dec!(0.0765));
        assert_eq!(rates.combined, dec!(0.2565));
    }

    #[test]
    fn at_wage_base_drops_social_security() {
        let config = TaxYearConfig::mfj_2025();
        let resolver = MarginalRateResolver::new(&config);

        assert_eq!(resolver.marginal_rates(dec!(176100)).fica, dec!(0.0145));
    }

    #[test]
    fn zero_income_uses_first_brackets() {
        let config = TaxYearConfig::mfj_2025();
        let resolver = MarginalRateResolver::new(&config);

        let rates = resolver.marginal_rates(dec!(0));

        assert_eq!(rates.federal, dec!(0.10));
        assert_eq!(rates.california, dec!(0.01));
        assert_eq!(rates.fica, dec!(0.0765));
    }

    #[test]
    fn income_at_deduction_stays_in_first_bracket() {
        let config = TaxYearConfig::mfj_2025();
        let resolver = MarginalRateResolver::new(&config);

        assert_eq!(resolver.marginal_rates(dec!(30000)).federal, dec!(0.10));
    }
}
