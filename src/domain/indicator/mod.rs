//! Indicator engine.
//!
//! - `sma`: rolling simple moving average over closes
//! - `IndicatorRow`: one bar's close alongside the fast and slow SMA
//! - `compute_indicators`: both averages for a whole price series

pub mod sma;

use chrono::NaiveDate;

use crate::domain::error::SmatraderError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::strategy::StrategyParams;

pub use sma::compute_sma;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
}

/// Compute the fast and slow SMA over the series' closes.
///
/// The two windows are computed independently of one another.
pub fn compute_indicators(
    series: &PriceSeries,
    params: &StrategyParams,
) -> Result<Vec<IndicatorRow>, SmatraderError> {
    let closes = series.closes();
    let fast = compute_sma(&closes, params.fast)?;
    let slow = compute_sma(&closes, params.slow)?;

    Ok(series
        .bars
        .iter()
        .zip(fast)
        .zip(slow)
        .map(|((bar, sma_fast), sma_slow)| IndicatorRow {
            date: bar.date,
            close: bar.close,
            sma_fast,
            sma_slow,
        })
        .collect())
}
