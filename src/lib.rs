//! Simple to use cli for tracking the carbon footprint of everyday activities.
//! Activities such as travel, home energy and food are recorded into an in-memory
//! [ledger::EmissionLedger], which derives totals, breakdowns and suggestions from a fixed table
//! of emission factors.
//!

pub mod cli;
pub mod ledger;
pub mod utils;
