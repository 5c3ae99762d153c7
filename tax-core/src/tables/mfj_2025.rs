//! 2025 parameters for Married Filing Jointly.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::models::{
    Bracket, BracketTable, FicaConfig, FilingStatusCode, IncomeTaxSchedule, JurisdictionShares,
    RetirementLimits, SafeHarborConfig, Surtax, TaxYearConfig,
};

pub const TAX_YEAR: i32 = 2025;

pub fn federal_brackets() -> BracketTable {
    BracketTable::from_static(vec![
        Bracket::new(dec!(23850), dec!(0.10)),
        Bracket::new(dec!(96950), dec!(0.12)),
        Bracket::new(dec!(206700), dec!(0.22)),
        Bracket::new(dec!(394600), dec!(0.24)),
        Bracket::new(dec!(501050), dec!(0.32)),
        Bracket::new(dec!(751600), dec!(0.35)),
        Bracket::top(dec!(0.37)),
    ])
}

pub fn california_brackets() -> BracketTable {
    BracketTable::from_static(vec![
        Bracket::new(dec!(21438), dec!(0.01)),
        Bracket::new(dec!(50852), dec!(0.02)),
        Bracket::new(dec!(80268), dec!(0.04)),
        Bracket::new(dec!(111484), dec!(0.06)),
        Bracket::new(dec!(140902), dec!(0.08)),
        Bracket::new(dec!(721318), dec!(0.093)),
        Bracket::new(dec!(865580), dec!(0.103)),
        Bracket::new(dec!(1441160), dec!(0.113)),
        Bracket::top(dec!(0.133)),
    ])
}

pub fn oklahoma_brackets() -> BracketTable {
    BracketTable::from_static(vec![
        Bracket::new(dec!(2000), dec!(0.0025)),
        Bracket::new(dec!(5000), dec!(0.0075)),
        Bracket::new(dec!(7500), dec!(0.0175)),
        Bracket::new(dec!(9800), dec!(0.0275)),
        Bracket::new(dec!(12200), dec!(0.0375)),
        Bracket::top(dec!(0.0475)),
    ])
}

fn due_date(
    year: i32,
    month: u32,
    day: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("static due date is a valid calendar date")
}

pub fn config() -> TaxYearConfig {
    TaxYearConfig {
        tax_year: TAX_YEAR,
        filing_status: FilingStatusCode::MarriedFilingJointly,
        federal: IncomeTaxSchedule {
            brackets: federal_brackets(),
            standard_deduction: dec!(30000),
        },
        california: IncomeTaxSchedule {
            brackets: california_brackets(),
            standard_deduction: dec!(11080),
        },
        california_surtax: Surtax {
            threshold: dec!(1000000),
            rate: dec!(0.01),
        },
        oklahoma: IncomeTaxSchedule {
            brackets: oklahoma_brackets(),
            standard_deduction: dec!(15000),
        },
        fica: FicaConfig {
            ss_wage_base: dec!(176100),
            ss_rate: dec!(0.062),
            medicare_rate: dec!(0.0145),
            additional_medicare_threshold: dec!(250000),
            additional_medicare_rate: dec!(0.009),
        },
        retirement: RetirementLimits {
            elective_deferral_limit: dec!(23500),
            catch_up_contribution: dec!(7500),
            catch_up_age: 50,
            annual_additions_limit: dec!(70000),
            pay_periods_per_year: 26,
            max_contribution_percent: dec!(75),
            estimated_marginal_rate: dec!(0.41),
        },
        safe_harbor: SafeHarborConfig {
            high_income_prior_year_factor: dec!(1.10),
            prior_year_factor: dec!(1.00),
            current_year_factor: dec!(0.90),
            high_income_agi_threshold: dec!(150000),
            fallback_shares: JurisdictionShares {
                federal: dec!(0.60),
                california: dec!(0.35),
                oklahoma: dec!(0.05),
            },
        },
        quarterly_due_dates: [
            due_date(2025, 4, 15),
            due_date(2025, 6, 15),
            due_date(2025, 9, 15),
            due_date(2026, 1, 15),
        ],
    }
}
