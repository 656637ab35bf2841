//! smatrader: SMA crossover backtester.
//!
//! Hexagonal architecture: the pure simulation core and its collaborators live
//! in [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
