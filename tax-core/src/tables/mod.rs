//! Static tax tables and the registry used to inject replacements.
//!
//! Built-in parameters live in one module per (year, filing status). Adding a
//! year means adding a sibling of [`mfj_2025`] and a match arm in
//! [`crate::TaxYearConfig::builtin`], or loading bracket tables at runtime
//! into a [`TaxTableRegistry`].

pub mod mfj_2025;
pub mod registry;

pub use registry::{TableKey, TableLookupError, TaxTableRegistry};
