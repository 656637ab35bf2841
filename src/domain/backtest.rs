//! Backtest pipeline: price series → indicators → signals → simulation → ledger.
//!
//! Each stage is a pure function; a run owns nothing between invocations, so
//! independent series can be simulated in parallel.

use rayon::prelude::*;
use std::fmt;

use super::error::SmatraderError;
use super::execution::{simulate, ExecutionParams};
use super::indicator::{compute_indicators, IndicatorRow};
use super::ledger::TradeLedger;
use super::ohlcv::PriceSeries;
use super::signal::{generate_from_rows, Signal};
use super::strategy::StrategyParams;

/// Non-fatal conditions reported alongside a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// fast >= slow; crossovers may be infrequent or absent.
    DegenerateWindows { fast: usize, slow: usize },
    /// Too few bars for a crossover to be detected and executed.
    InsufficientData { bars: usize, minimum: usize },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::DegenerateWindows { fast, slow } => write!(
                f,
                "fast window ({}) >= slow window ({}); crossover may be degenerate",
                fast, slow
            ),
            Advisory::InsufficientData { bars, minimum } => write!(
                f,
                "only {} bars, need at least {} for a trade",
                bars, minimum
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub symbol: String,
    pub indicators: Vec<IndicatorRow>,
    pub signals: Vec<Signal>,
    pub ledger: TradeLedger,
    pub advisories: Vec<Advisory>,
}

/// Parameter checks shared by single and multi-series runs.
pub fn validate_params(
    strategy: &StrategyParams,
    execution: &ExecutionParams,
) -> Result<(), SmatraderError> {
    strategy.validate()?;
    execution.validate()
}

pub fn collect_advisories(series: &PriceSeries, strategy: &StrategyParams) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if strategy.is_degenerate() {
        advisories.push(Advisory::DegenerateWindows {
            fast: strategy.fast,
            slow: strategy.slow,
        });
    }
    if series.len() < strategy.minimum_bars() {
        advisories.push(Advisory::InsufficientData {
            bars: series.len(),
            minimum: strategy.minimum_bars(),
        });
    }
    advisories
}

/// Run the SMA crossover backtest over one series.
///
/// Invalid parameters fail before any computation. A short series or a
/// degenerate window pair is reported in `advisories`, never as an error.
pub fn run_backtest(
    series: &PriceSeries,
    strategy: &StrategyParams,
    execution: &ExecutionParams,
) -> Result<BacktestResult, SmatraderError> {
    validate_params(strategy, execution)?;

    let advisories = collect_advisories(series, strategy);
    for advisory in &advisories {
        tracing::warn!(symbol = %series.symbol, "{}", advisory);
    }

    let indicators = compute_indicators(series, strategy)?;
    let signals = generate_from_rows(&indicators)?;
    let ledger = simulate(&series.bars, &signals, execution)?;

    tracing::debug!(
        symbol = %series.symbol,
        bars = series.len(),
        trades = ledger.len(),
        "backtest complete"
    );

    Ok(BacktestResult {
        symbol: series.symbol.clone(),
        indicators,
        signals,
        ledger,
        advisories,
    })
}

/// Run every series independently and in parallel. Results keep input order.
pub fn run_universe(
    universe: &[PriceSeries],
    strategy: &StrategyParams,
    execution: &ExecutionParams,
) -> Result<Vec<BacktestResult>, SmatraderError> {
    validate_params(strategy, execution)?;
    universe
        .par_iter()
        .map(|series| run_backtest(series, strategy, execution))
        .collect()
}
