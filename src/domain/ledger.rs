//! Trade ledger: the ordered output of a simulation run.

use crate::domain::position::Trade;

/// Append-only list of trades in execution order.
///
/// Holds any number of closed trades followed by at most one open trade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn closed_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| !t.is_open())
    }

    pub fn open_trade(&self) -> Option<&Trade> {
        self.trades.iter().find(|t| t.is_open())
    }

    /// Sum of profit/loss over closed trades.
    pub fn realized_pnl(&self) -> f64 {
        self.trades.iter().filter_map(Trade::profit_loss).sum()
    }

    /// Stable sort by entry date; a no-op for ledgers built by the simulator.
    pub fn sort_by_entry_date(&mut self) {
        self.trades.sort_by_key(|t| t.entry_date);
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}

impl<'a> IntoIterator for &'a TradeLedger {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
