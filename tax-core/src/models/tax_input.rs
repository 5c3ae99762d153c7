use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections raised by the validation step that runs before any calculator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} ({value}) cannot exceed gross income ({gross_income})")]
    ExceedsGrossIncome {
        field: &'static str,
        value: Decimal,
        gross_income: Decimal,
    },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: Decimal },

    #[error("{field} ({value}) exceeds the supported maximum of {limit}")]
    ExceedsLimit {
        field: &'static str,
        value: Decimal,
        limit: Decimal,
    },

    #[error("{field} ({value}) exceeds {max} pay periods per year")]
    TooManyPayPeriods {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// Largest amount any money input may carry. Products of amounts and rates
/// stay far inside `Decimal`'s range below this.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

pub(crate) fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputError> {
    if value < Decimal::ZERO {
        return Err(InputError::Negative { field, value });
    }
    Ok(())
}

/// Rejects negative amounts and amounts above [`MAX_AMOUNT`].
pub(crate) fn bounded_amount(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputError> {
    non_negative(field, value)?;
    if value > MAX_AMOUNT {
        return Err(InputError::ExceedsLimit {
            field,
            value,
            limit: MAX_AMOUNT,
        });
    }
    Ok(())
}

pub(crate) fn pay_periods_within(
    field: &'static str,
    value: u32,
    max: u32,
) -> Result<(), InputError> {
    if value > max {
        return Err(InputError::TooManyPayPeriods { field, value, max });
    }
    Ok(())
}

/// Annual figures for one household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxInput {
    /// Total gross income including W-2 wages and RSU vest income.
    pub gross_income: Decimal,
    /// Pre-tax 401(k) deferrals.
    pub pretax_401k: Decimal,
    /// Portion of gross income sourced from Oklahoma.
    pub oklahoma_income: Decimal,
    /// RSU vest income, already included in `gross_income`.
    pub rsu_income: Decimal,
}

impl TaxInput {
    pub fn new(gross_income: Decimal) -> Self {
        Self {
            gross_income,
            ..Self::default()
        }
    }

    pub fn with_pretax_401k(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.pretax_401k = amount;
        self
    }

    pub fn with_oklahoma_income(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.oklahoma_income = amount;
        self
    }

    pub fn with_rsu_income(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.rsu_income = amount;
        self
    }

    /// Checks that every amount is non-negative and that the components
    /// carved out of gross income do not exceed it.
    pub fn validate(&self) -> Result<(), InputError> {
        bounded_amount("gross_income", self.gross_income)?;
        non_negative("pretax_401k", self.pretax_401k)?;
        non_negative("oklahoma_income", self.oklahoma_income)?;
        non_negative("rsu_income", self.rsu_income)?;

        for (field, value) in [
            ("pretax_401k", self.pretax_401k),
            ("oklahoma_income", self.oklahoma_income),
            ("rsu_income", self.rsu_income),
        ] {
            if value > self.gross_income {
                return Err(InputError::ExceedsGrossIncome {
                    field,
                    value,
                    gross_income: self.gross_income,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validate_accepts_typical_input() {
        let input = TaxInput::new(dec!(450000))
            .with_pretax_401k(dec!(23500))
            .with_oklahoma_income(dec!(40000))
            .with_rsu_income(dec!(120000));

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_zero_income() {
        assert_eq!(TaxInput::new(dec!(0)).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_gross_income() {
        let result = TaxInput::new(dec!(-1)).validate();

        assert_eq!(
            result,
            Err(InputError::Negative {
                field: "gross_income",
                value: dec!(-1)
            })
        );
    }

    #[test]
    fn validate_rejects_oklahoma_income_above_gross() {
        let result = TaxInput::new(dec!(100000))
            .with_oklahoma_income(dec!(100001))
            .validate();

        assert_eq!(
            result,
            Err(InputError::ExceedsGrossIncome {
                field: "oklahoma_income",
                value: dec!(100001),
                gross_income: dec!(100000),
            })
        );
    }

    #[test]
    fn validate_rejects_rsu_income_above_gross() {
        let result = TaxInput::new(dec!(10))
            .with_rsu_income(dec!(20))
            .validate();

        assert!(matches!(
            result,
            Err(InputError::ExceedsGrossIncome {
                field: "rsu_income",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_gross_income_above_supported_maximum() {
        let huge = Decimal::MAX - dec!(1);

        assert_eq!(
            TaxInput::new(huge).validate(),
            Err(InputError::ExceedsLimit {
                field: "gross_income",
                value: huge,
                limit: MAX_AMOUNT,
            })
        );
        assert_eq!(TaxInput::new(MAX_AMOUNT).validate(), Ok(()));
    }
}
