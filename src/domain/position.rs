//! Position state and trade records.

use chrono::NaiveDate;

/// Simulation state for the single position slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long {
        entry_price: f64,
        entry_date: NaiveDate,
        entry_index: usize,
    },
}

impl Position {
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeExit {
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub profit_loss: f64,
    pub bars_held: usize,
}

/// A completed trade, or the position still open when the series ended
/// (`exit` is `None`).
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub quantity: i64,
    pub exit: Option<TradeExit>,
}

impl Trade {
    pub fn open(entry_date: NaiveDate, entry_price: f64, quantity: i64) -> Self {
        Self {
            entry_date,
            entry_price,
            quantity,
            exit: None,
        }
    }

    /// (exit_price - entry_price) * quantity
    pub fn closed(
        entry_date: NaiveDate,
        entry_price: f64,
        quantity: i64,
        exit_date: NaiveDate,
        exit_price: f64,
        bars_held: usize,
    ) -> Self {
        Self {
            entry_date,
            entry_price,
            quantity,
            exit: Some(TradeExit {
                exit_date,
                exit_price,
                profit_loss: (exit_price - entry_price) * quantity as f64,
                bars_held,
            }),
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit.is_none()
    }

    pub fn exit_date(&self) -> Option<NaiveDate> {
        self.exit.as_ref().map(|e| e.exit_date)
    }

    pub fn exit_price(&self) -> Option<f64> {
        self.exit.as_ref().map(|e| e.exit_price)
    }

    pub fn profit_loss(&self) -> Option<f64> {
        self.exit.as_ref().map(|e| e.profit_loss)
    }

    pub fn bars_held(&self) -> Option<usize> {
        self.exit.as_ref().map(|e| e.bars_held)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn default_is_flat() {
        let pos = Position::default();
        assert!(pos.is_flat());
        assert!(!pos.is_long());
    }

    #[test]
    fn long_state() {
        let pos = Position::Long {
            entry_price: 50.0,
            entry_date: date(15),
            entry_index: 3,
        };
        assert!(pos.is_long());
        assert!(!pos.is_flat());
    }

    #[test]
    fn closed_trade_pnl_profit() {
        let trade = Trade::closed(date(2), 50.0, 100, date(9), 55.0, 5);
        assert!(!trade.is_open());
        assert_eq!(trade.profit_loss(), Some(500.0));
        assert_eq!(trade.exit_date(), Some(date(9)));
        assert_eq!(trade.exit_price(), Some(55.0));
        assert_eq!(trade.bars_held(), Some(5));
    }

    #[test]
    fn closed_trade_pnl_loss() {
        let trade = Trade::closed(date(2), 50.0, 10, date(4), 45.5, 2);
        assert_eq!(trade.profit_loss(), Some(-45.0));
    }

    #[test]
    fn open_trade_has_no_exit_fields() {
        let trade = Trade::open(date(2), 50.0, 10);
        assert!(trade.is_open());
        assert_eq!(trade.exit_date(), None);
        assert_eq!(trade.exit_price(), None);
        assert_eq!(trade.profit_loss(), None);
        assert_eq!(trade.bars_held(), None);
        assert_eq!(trade.quantity, 10);
    }
}
