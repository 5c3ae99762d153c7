//! 401(k) deferral planning.

use rust_decimal::Decimal;
use tracing::debug;

use super::common::{non_negative, round_half_up, round_percent, safe_ratio};
use crate::models::{
    ContributionLimits, ContributionScenario, OptimizerRequest, OptimizerResult,
    RetirementLimits, ScenarioPeriod, ScenarioRequest,
};

/// Recommends and projects elective deferrals against the annual cap.
///
/// Salary is assumed to be paid evenly over
/// [`RetirementLimits::pay_periods_per_year`] periods. Tax savings use the
/// flat [`RetirementLimits::estimated_marginal_rate`] rather than the
/// household's computed marginal rate.
#[derive(Debug, Clone, Copy)]
pub struct ContributionOptimizer<'a> {
    limits: &'a RetirementLimits,
}

impl<'a> ContributionOptimizer<'a> {
    pub fn new(limits: &'a RetirementLimits) -> Self {
        Self { limits }
    }

    /// Elective deferral cap, including catch-up when `age` qualifies.
    pub fn max_contribution(
        &self,
        age: Option<u32>,
    ) -> Decimal {
        if self.catch_up_eligible(age) {
            self.limits.elective_deferral_limit + self.limits.catch_up_contribution
        } else {
            self.limits.elective_deferral_limit
        }
    }

    pub fn limits(&self) -> ContributionLimits {
        ContributionLimits {
            elective_deferral_limit: self.limits.elective_deferral_limit,
            catch_up_contribution: self.limits.catch_up_contribution,
            catch_up_age: self.limits.catch_up_age,
            total_with_catch_up: self.limits.elective_deferral_limit
                + self.limits.catch_up_contribution,
            annual_additions_limit: self.limits.annual_additions_limit,
        }
    }

    /// Percentage of pay that reaches the cap exactly over the remaining
    /// pay periods, limited to the plan maximum.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{ContributionOptimizer, OptimizerRequest, TaxYearConfig};
    ///
    /// let config = TaxYearConfig::mfj_2025();
    /// let result = ContributionOptimizer::new(&config.retirement).optimize(&OptimizerRequest {
    ///     current_contribution_percent: dec!(5),
    ///     annual_salary: dec!(200000),
    ///     ytd_contribution: dec!(10000),
    ///     remaining_pay_periods: 13,
    ///     age: Some(55),
    /// });
    ///
    /// assert_eq!(result.recommended_percent, dec!(21.0));
    /// assert_eq!(result.max_contribution, dec!(31000));
    /// ```
    pub fn optimize(
        &self,
        request: &OptimizerRequest,
    ) -> OptimizerResult {
        let max_contribution = self.max_contribution(request.age);
        let room = non_negative(max_contribution - request.ytd_contribution);
        let recommended = self.recommended_percent(
            room,
            request.annual_salary,
            request.remaining_pay_periods,
        );
        debug!(%max_contribution, %room, %recommended, "401(k) recommendation");

        let planned = self.deferral_over_periods(
            request.annual_salary,
            recommended,
            request.remaining_pay_periods,
        );
        let projected = (request.ytd_contribution + planned).min(max_contribution);
        let savings = (projected - request.ytd_contribution) * self.limits.estimated_marginal_rate;

        OptimizerResult {
            current_contribution_percent: request.current_contribution_percent,
            recommended_percent: round_percent(recommended),
            remaining_contribution_room: round_half_up(room),
            max_contribution,
            projected_year_end_contribution: round_half_up(projected),
            tax_savings: round_half_up(savings),
        }
    }

    /// Walks the remaining pay periods at a fixed percentage, stopping
    /// contributions once the cap is reached.
    pub fn scenario(
        &self,
        request: &ScenarioRequest,
    ) -> ContributionScenario {
        let max_contribution = self.max_contribution(request.age);
        let per_period = self.deferral_over_periods(
            request.annual_salary,
            request.contribution_percent,
            1,
        );

        let mut cumulative = request.ytd_contribution;
        let mut max_out_period = None;
        let capacity = request
            .remaining_pay_periods
            .min(self.limits.pay_periods_per_year);
        let mut periods = Vec::with_capacity(capacity as usize);

        for period in 1..=request.remaining_pay_periods {
            let contribution = per_period.min(non_negative(max_contribution - cumulative));
            cumulative += contribution;
            if max_out_period.is_none() && cumulative >= max_contribution {
                max_out_period = Some(period);
            }
            periods.push(ScenarioPeriod {
                period,
                contribution: round_half_up(contribution),
                cumulative: round_half_up(cumulative),
                remaining_room: round_half_up(non_negative(max_contribution - cumulative)),
            });
        }

        ContributionScenario {
            catch_up_eligible: self.catch_up_eligible(request.age),
            max_contribution,
            final_contribution: round_half_up(cumulative),
            will_max_out: cumulative >= max_contribution,
            max_out_period,
            estimated_tax_savings: round_half_up(cumulative * self.limits.estimated_marginal_rate),
            periods,
        }
    }

    fn catch_up_eligible(
        &self,
        age: Option<u32>,
    ) -> bool {
        age.is_some_and(|age| age >= self.limits.catch_up_age)
    }

    /// Unrounded percentage needed to defer `room` over `remaining_periods`.
    fn recommended_percent(
        &self,
        room: Decimal,
        annual_salary: Decimal,
        remaining_periods: u32,
    ) -> Decimal {
        if remaining_periods == 0 || annual_salary <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let periods_per_year = Decimal::from(self.limits.pay_periods_per_year);
        let numerator = room * periods_per_year * Decimal::ONE_HUNDRED;
        let denominator = Decimal::from(remaining_periods) * annual_salary;

        safe_ratio(numerator, denominator, Decimal::ZERO)
            .clamp(Decimal::ZERO, self.limits.max_contribution_percent)
    }

    /// Deferral from `percent` of pay over `periods` pay periods.
    fn deferral_over_periods(
        &self,
        annual_salary: Decimal,
        percent: Decimal,
        periods: u32,
    ) -> Decimal {
        let numerator = annual_salary * percent * Decimal::from(periods);
        let denominator = Decimal::from(self.limits.pay_periods_per_year) * Decimal::ONE_HUNDRED;
        safe_ratio(numerator, denominator, Decimal::ZERO)
    }
}
