mod bracket_table;
mod filing_status;
mod jurisdiction;
mod paystub;
mod projection;
mod quarterly;
mod retirement;
mod tax_breakdown;
mod tax_input;
mod tax_year_config;
mod vesting;

pub use bracket_table::{Bracket, BracketTable, BracketTableError};
pub use filing_status::FilingStatusCode;
pub use jurisdiction::Jurisdiction;
pub use paystub::{Paystub, PaystubWarning, YtdTotals};
pub use projection::{ProjectionOptions, TaxProjection};
pub use quarterly::{
    QuarterlyAllocation, QuarterlyInstallment, QuarterlyPayments, SafeHarborOption,
    SafeHarborSummary, ScheduleError,
};
pub use retirement::{
    ContributionLimits, ContributionScenario, OptimizerRequest, OptimizerResult, ScenarioPeriod,
    ScenarioRequest,
};
pub use tax_breakdown::{FicaComponents, MarginalRates, TaxBreakdown};
pub use tax_input::{InputError, MAX_AMOUNT, TaxInput};
pub use tax_year_config::{
    FicaConfig, IncomeTaxSchedule, JurisdictionShares, RetirementLimits, SafeHarborConfig, Surtax,
    TaxYearConfig,
};
pub use vesting::{RsuVestingEvent, VestingSummary};
