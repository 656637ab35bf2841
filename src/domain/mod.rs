//! Core domain types and logic.
//!
//! The simulation core (`ohlcv` → `indicator` → `signal` → `execution` →
//! `ledger`) is pure and performs no I/O.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod execution;
pub mod ledger;
pub mod backtest;
pub mod strategy;
pub mod metrics;
pub mod cleaning;
pub mod config_validation;
pub mod error;
