//! ROOKIE LEDGER — dynasty league dashboard core
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod league;
pub mod picks;
pub mod values;
pub mod sleeper;
pub mod engine;
pub mod relay;
