//! Household tax engine: bracket tables, per-jurisdiction calculators, and
//! the planning tools built on top of them.

pub mod calculations;
pub mod models;
pub mod tables;

pub use calculations::{
    ContributionOptimizer, FicaCalculator, IncomeTaxCalculator, MarginalRateResolver,
    QuarterlyAllocator, TaxCalculator, TaxProjector,
};
pub use models::*;
pub use tables::{TableKey, TableLookupError, TaxTableRegistry};
