//! Realized performance statistics over trade ledgers.

use super::ledger::TradeLedger;
use super::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub closed_trades: usize,
    pub open_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_bars_held: f64,
    pub start_equity: f64,
    pub ending_equity: f64,
    pub total_return: f64,
}

impl LedgerSummary {
    pub fn compute(ledger: &TradeLedger, start_equity: f64) -> Self {
        Self::from_trades(ledger.iter(), start_equity)
    }

    /// Aggregate over several ledgers, e.g. one per instrument.
    pub fn compute_many<'a, I>(ledgers: I, start_equity: f64) -> Self
    where
        I: IntoIterator<Item = &'a TradeLedger>,
    {
        Self::from_trades(ledgers.into_iter().flat_map(|l| l.iter()), start_equity)
    }

    fn from_trades<'a>(trades: impl Iterator<Item = &'a Trade>, start_equity: f64) -> Self {
        let mut open_trades = 0usize;
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_bars_held = 0usize;

        for trade in trades {
            let Some(exit) = &trade.exit else {
                open_trades += 1;
                continue;
            };

            let pnl = exit.profit_loss;
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                trades_breakeven += 1;
            }
            total_bars_held += exit.bars_held;
        }

        let closed_trades = trades_won + trades_lost + trades_breakeven;
        let total_pnl = total_wins - total_losses;

        let win_rate = if closed_trades > 0 {
            trades_won as f64 / closed_trades as f64
        } else {
            0.0
        };

        let avg_pnl = if closed_trades > 0 {
            total_pnl / closed_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_bars_held = if closed_trades > 0 {
            total_bars_held as f64 / closed_trades as f64
        } else {
            0.0
        };

        let ending_equity = start_equity + total_pnl;
        let total_return = if start_equity > 0.0 {
            total_pnl / start_equity
        } else {
            0.0
        };

        LedgerSummary {
            closed_trades,
            open_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            total_pnl,
            avg_pnl,
            profit_factor,
            largest_win,
            largest_loss,
            avg_bars_held,
            start_equity,
            ending_equity,
            total_return,
        }
    }
}
