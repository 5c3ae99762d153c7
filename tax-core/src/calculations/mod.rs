//! Calculators over a [`crate::TaxYearConfig`].
//!
//! Each calculator borrows the configuration it needs and exposes pure
//! functions of its inputs. [`TaxCalculator`] combines the per-jurisdiction
//! calculators into a [`crate::TaxBreakdown`]; the planning tools
//! (quarterly payments, safe harbor, 401(k), projections, vesting) build on
//! that result.

pub mod brackets;
pub mod common;
mod fica;
mod income_tax;
mod marginal;
mod optimizer;
mod projection;
mod quarterly;
mod safe_harbor;
mod total;
mod vesting;

pub use fica::FicaCalculator;
pub use income_tax::IncomeTaxCalculator;
pub use marginal::MarginalRateResolver;
pub use optimizer::ContributionOptimizer;
pub use projection::TaxProjector;
pub use quarterly::QuarterlyAllocator;
pub use total::TaxCalculator;
pub use vesting::vest_income_for_year;
