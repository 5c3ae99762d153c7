//! Command-line front end for the household tax planner.

pub mod app;
pub mod config;
pub mod logging;
