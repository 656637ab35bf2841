//! Position simulation and fill at the next bar's open.
//!
//! A two-state machine (flat / long) walks the lagged signal series. The signal
//! at bar `i` executes at bar `i + 1`'s open, so the final bar can never
//! originate an execution.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::error::SmatraderError;
use super::ledger::TradeLedger;
use super::ohlcv::Bar;
use super::position::{Position, Trade};
use super::signal::Signal;

/// When a signal is filled. Only the next bar's open is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    #[default]
    NextOpen,
}

impl FromStr for FillPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "next_open" => Ok(FillPolicy::NextOpen),
            other => Err(format!("unsupported fill policy '{}' (expected next_open)", other)),
        }
    }
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillPolicy::NextOpen => write!(f, "next_open"),
        }
    }
}

/// Execution parameters applied uniformly to every trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionParams {
    pub fill: FillPolicy,
    pub quantity: i64,
}

impl ExecutionParams {
    pub fn new(quantity: i64) -> Self {
        Self {
            fill: FillPolicy::NextOpen,
            quantity,
        }
    }

    pub fn validate(&self) -> Result<(), SmatraderError> {
        if self.quantity <= 0 {
            return Err(SmatraderError::invalid_parameter(
                "quantity",
                format!("trade quantity must be positive, got {}", self.quantity),
            ));
        }
        Ok(())
    }
}

/// Where and when an execution happens.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fill {
    index: usize,
    date: NaiveDate,
    price: f64,
}

impl Fill {
    fn next_open(bars: &[Bar], i: usize) -> Self {
        let bar = &bars[i + 1];
        Fill {
            index: i + 1,
            date: bar.date,
            price: bar.open,
        }
    }
}

/// One transition of the position state machine. Returns the next state and
/// the trade completed by this step, if any.
fn step(position: Position, signal: Signal, fill: Fill, quantity: i64) -> (Position, Option<Trade>) {
    match (position, signal) {
        (Position::Flat, Signal::EnterLong) => (
            Position::Long {
                entry_price: fill.price,
                entry_date: fill.date,
                entry_index: fill.index,
            },
            None,
        ),
        (
            Position::Long {
                entry_price,
                entry_date,
                entry_index,
            },
            Signal::ExitLong,
        ) => {
            let trade = Trade::closed(
                entry_date,
                entry_price,
                quantity,
                fill.date,
                fill.price,
                fill.index - entry_index,
            );
            (Position::Flat, Some(trade))
        }
        (state, _) => (state, None),
    }
}

/// Run the position state machine over `bars` using the lagged `signals`.
///
/// A position still open after the last bar is appended as an open trade.
pub fn simulate(
    bars: &[Bar],
    signals: &[Signal],
    params: &ExecutionParams,
) -> Result<TradeLedger, SmatraderError> {
    params.validate()?;
    if bars.len() != signals.len() {
        return Err(SmatraderError::invalid_parameter(
            "signals",
            format!(
                "length {} does not match bar count {}",
                signals.len(),
                bars.len()
            ),
        ));
    }

    let mut ledger = TradeLedger::new();
    let mut position = Position::Flat;

    for i in 0..bars.len().saturating_sub(1) {
        let fill = match params.fill {
            FillPolicy::NextOpen => Fill::next_open(bars, i),
        };
        let (next, completed) = step(position, signals[i], fill, params.quantity);
        if let Some(trade) = completed {
            tracing::debug!(
                entry_date = %trade.entry_date,
                exit_date = %fill.date,
                pnl = trade.profit_loss().unwrap_or_default(),
                "closed trade"
            );
            ledger.push(trade);
        } else if position.is_flat() && next.is_long() {
            tracing::debug!(date = %fill.date, price = fill.price, "opened position");
        }
        position = next;
    }

    if let Position::Long {
        entry_price,
        entry_date,
        ..
    } = position
    {
        ledger.push(Trade::open(entry_date, entry_price, params.quantity));
    }

    Ok(ledger)
}
