use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BracketTable, FilingStatusCode, Jurisdiction};
use crate::tables::{TableKey, TaxTableRegistry, mfj_2025};

/// A progressive schedule together with the standard deduction taken before
/// the schedule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxSchedule {
    pub brackets: BracketTable,
    pub standard_deduction: Decimal,
}

/// A flat surtax on taxable income above `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surtax {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Payroll tax parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaConfig {
    /// Wages above this amount are not subject to social security tax.
    pub ss_wage_base: Decimal,
    /// Employee share of social security tax.
    pub ss_rate: Decimal,
    /// Employee share of Medicare tax, uncapped.
    pub medicare_rate: Decimal,
    /// Combined household wages above which additional Medicare tax applies.
    pub additional_medicare_threshold: Decimal,
    pub additional_medicare_rate: Decimal,
}

/// Elective-deferral limits and payroll assumptions for 401(k) planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementLimits {
    pub elective_deferral_limit: Decimal,
    pub catch_up_contribution: Decimal,
    pub catch_up_age: u32,
    /// Employee + employer annual additions limit. Informational only.
    pub annual_additions_limit: Decimal,
    pub pay_periods_per_year: u32,
    /// Plan ceiling on the deferral percentage.
    pub max_contribution_percent: Decimal,
    /// Blended marginal rate used to estimate the tax value of deferrals.
    pub estimated_marginal_rate: Decimal,
}

/// Share of the quarterly payment assigned to each jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionShares {
    pub federal: Decimal,
    pub california: Decimal,
    pub oklahoma: Decimal,
}

/// Estimated-payment safe-harbor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeHarborConfig {
    /// Prior-year multiplier for high-income filers (110%).
    pub high_income_prior_year_factor: Decimal,
    /// Prior-year multiplier for everyone else (100%).
    pub prior_year_factor: Decimal,
    /// Current-year multiplier (90%).
    pub current_year_factor: Decimal,
    /// Prior-year AGI above which the high-income factor applies.
    pub high_income_agi_threshold: Decimal,
    /// Split used when there is no liability to apportion.
    pub fallback_shares: JurisdictionShares,
}

/// Every rate, limit and table needed to compute one household's taxes for
/// one year and filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub filing_status: FilingStatusCode,
    pub federal: IncomeTaxSchedule,
    pub california: IncomeTaxSchedule,
    /// Mental Health Services Tax.
    pub california_surtax: Surtax,
    pub oklahoma: IncomeTaxSchedule,
    pub fica: FicaConfig,
    pub retirement: RetirementLimits,
    pub safe_harbor: SafeHarborConfig,
    /// Estimated payment due dates for Q1 through Q4.
    pub quarterly_due_dates: [NaiveDate; 4],
}

impl TaxYearConfig {
    /// Built-in 2025 Married Filing Jointly parameters.
    pub fn mfj_2025() -> Self {
        mfj_2025::config()
    }

    /// Looks up a built-in configuration.
    pub fn builtin(
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> Option<Self> {
        match (tax_year, filing_status) {
            (2025, FilingStatusCode::MarriedFilingJointly) => Some(Self::mfj_2025()),
            _ => None,
        }
    }

    pub fn schedule(
        &self,
        jurisdiction: Jurisdiction,
    ) -> &IncomeTaxSchedule {
        match jurisdiction {
            Jurisdiction::Federal => &self.federal,
            Jurisdiction::California => &self.california,
            Jurisdiction::Oklahoma => &self.oklahoma,
        }
    }

    fn schedule_mut(
        &mut self,
        jurisdiction: Jurisdiction,
    ) -> &mut IncomeTaxSchedule {
        match jurisdiction {
            Jurisdiction::Federal => &mut self.federal,
            Jurisdiction::California => &mut self.california,
            Jurisdiction::Oklahoma => &mut self.oklahoma,
        }
    }

    /// Replaces each jurisdiction's bracket table with the registry entry
    /// keyed by this config's year and filing status, when one exists.
    /// Standard deductions and every other parameter are left untouched.
    pub fn with_registry_tables(
        mut self,
        registry: &TaxTableRegistry,
    ) -> Self {
        for jurisdiction in Jurisdiction::ALL {
            let key = TableKey::new(self.tax_year, jurisdiction, self.filing_status);
            if let Ok(table) = registry.get(&key) {
                self.schedule_mut(jurisdiction).brackets = table.clone();
            }
        }
        self
    }
}
