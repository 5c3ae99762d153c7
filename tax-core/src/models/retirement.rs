use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax_input::{InputError, bounded_amount, pay_periods_within};

/// Inputs for the contribution-percentage recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerRequest {
    pub current_contribution_percent: Decimal,
    pub annual_salary: Decimal,
    pub ytd_contribution: Decimal,
    pub remaining_pay_periods: u32,
    /// Age at year end. `None` means catch-up eligibility is unknown and is
    /// treated as not eligible.
    pub age: Option<u32>,
}

impl OptimizerRequest {
    /// `pay_periods_per_year` bounds `remaining_pay_periods`.
    pub fn validate(
        &self,
        pay_periods_per_year: u32,
    ) -> Result<(), InputError> {
        bounded_amount("current_contribution_percent", self.current_contribution_percent)?;
        bounded_amount("annual_salary", self.annual_salary)?;
        bounded_amount("ytd_contribution", self.ytd_contribution)?;
        pay_periods_within(
            "remaining_pay_periods",
            self.remaining_pay_periods,
            pay_periods_per_year,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerResult {
    pub current_contribution_percent: Decimal,
    /// Deferral percentage, one decimal place.
    pub recommended_percent: Decimal,
    pub remaining_contribution_room: Decimal,
    pub max_contribution: Decimal,
    pub projected_year_end_contribution: Decimal,
    /// Blended-rate estimate of the income tax avoided by the remaining
    /// deferrals. Negative when YTD is already above the cap.
    pub tax_savings: Decimal,
}

impl fmt::Display for OptimizerResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Current contribution:      {:>10}%", self.current_contribution_percent)?;
        writeln!(f, "Recommended contribution:  {:>10}%", self.recommended_percent)?;
        writeln!(f, "Maximum contribution:      {:>11}", self.max_contribution)?;
        writeln!(f, "Remaining room:            {:>11}", self.remaining_contribution_room)?;
        writeln!(f, "Projected year-end total:  {:>11}", self.projected_year_end_contribution)?;
        write!(f, "Estimated tax savings:     {:>11}", self.tax_savings)
    }
}

/// Inputs for projecting a fixed contribution percentage period by period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub annual_salary: Decimal,
    pub contribution_percent: Decimal,
    pub ytd_contribution: Decimal,
    pub remaining_pay_periods: u32,
    pub age: Option<u32>,
}

impl ScenarioRequest {
    pub fn validate(
        &self,
        pay_periods_per_year: u32,
    ) -> Result<(), InputError> {
        bounded_amount("annual_salary", self.annual_salary)?;
        bounded_amount("contribution_percent", self.contribution_percent)?;
        bounded_amount("ytd_contribution", self.ytd_contribution)?;
        pay_periods_within(
            "remaining_pay_periods",
            self.remaining_pay_periods,
            pay_periods_per_year,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPeriod {
    /// 1-based pay period counted from now.
    pub period: u32,
    pub contribution: Decimal,
    pub cumulative: Decimal,
    pub remaining_room: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionScenario {
    pub catch_up_eligible: bool,
    pub max_contribution: Decimal,
    pub final_contribution: Decimal,
    pub will_max_out: bool,
    /// First period in which the cumulative total reaches the cap.
    pub max_out_period: Option<u32>,
    pub estimated_tax_savings: Decimal,
    pub periods: Vec<ScenarioPeriod>,
}

impl fmt::Display for ContributionScenario {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Maximum contribution:   {:>11}", self.max_contribution)?;
        writeln!(f, "Final contribution:     {:>11}", self.final_contribution)?;
        match self.max_out_period {
            Some(period) => writeln!(f, "Reaches the cap in pay period {period}")?,
            None => writeln!(f, "Does not reach the cap this year")?,
        }
        writeln!(f, "Estimated tax savings:  {:>11}", self.estimated_tax_savings)?;
        writeln!(f, "Period  Contribution  Cumulative  Remaining room")?;
        for p in &self.periods {
            writeln!(
                f,
                "{:>6}  {:>12}  {:>10}  {:>14}",
                p.period, p.contribution, p.cumulative, p.remaining_room
            )?;
        }
        Ok(())
    }
}

/// Published deferral limits for a plan year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLimits {
    pub elective_deferral_limit: Decimal,
    pub catch_up_contribution: Decimal,
    pub catch_up_age: u32,
    pub total_with_catch_up: Decimal,
    pub annual_additions_limit: Decimal,
}

impl fmt::Display for ContributionLimits {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Elective deferral limit:  {:>10}", self.elective_deferral_limit)?;
        writeln!(
            f,
            "Catch-up (age {}+):       {:>10}",
            self.catch_up_age, self.catch_up_contribution
        )?;
        writeln!(f, "Total with catch-up:      {:>10}", self.total_with_catch_up)?;
        write!(f, "Annual additions limit:   {:>10}", self.annual_additions_limit)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn optimizer_request_rejects_negative_salary() {
        let request = OptimizerRequest {
            current_contribution_percent: dec!(5),
            annual_salary: dec!(-1),
            ytd_contribution: dec!(0),
            remaining_pay_periods: 10,
            age: None,
        };

        assert_eq!(
            request.validate(26),
            Err(InputError::Negative {
                field: "annual_salary",
                value: dec!(-1)
            })
        );
    }

    #[test]
    fn scenario_request_accepts_zero_ytd() {
        let request = ScenarioRequest {
            annual_salary: dec!(150000),
            contribution_percent: dec!(10),
            ytd_contribution: dec!(0),
            remaining_pay_periods: 26,
            age: Some(40),
        };

        assert_eq!(request.validate(26), Ok(()));
    }

    #[test]
    fn requests_reject_more_periods_than_a_year_has() {
        let scenario = ScenarioRequest {
            annual_salary: dec!(150000),
            contribution_percent: dec!(10),
            ytd_contribution: dec!(0),
            remaining_pay_periods: 27,
            age: None,
        };
        let optimizer = OptimizerRequest {
            current_contribution_percent: dec!(5),
            annual_salary: dec!(150000),
            ytd_contribution: dec!(0),
            remaining_pay_periods: u32::MAX,
            age: None,
        };

        assert_eq!(
            scenario.validate(26),
            Err(InputError::TooManyPayPeriods {
                field: "remaining_pay_periods",
                value: 27,
                max: 26,
            })
        );
        assert!(matches!(
            optimizer.validate(26),
            Err(InputError::TooManyPayPeriods { value: u32::MAX, .. })
        ));
    }
}
