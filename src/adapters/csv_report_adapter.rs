//! Orders CSV and plain-text validation report.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::cleaning::CleaningReport;
use crate::domain::error::SmatraderError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::position::Trade;
use crate::ports::report_port::ReportPort;

pub const ORDER_COLUMNS: [&str; 8] = [
    "symbol",
    "entry_dt",
    "entry_price",
    "qty",
    "exit_dt",
    "exit_price",
    "pnl",
    "bars_held",
];

pub const CLEAN_COLUMNS: [&str; 7] = ["date", "symbol", "open", "high", "low", "close", "volume"];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Cleaned bars stacked by symbol. Columns: date, symbol, open, high,
    /// low, close, volume.
    pub fn write_clean_csv<'a>(
        &self,
        series: impl IntoIterator<Item = &'a PriceSeries>,
        output_path: &Path,
    ) -> Result<(), SmatraderError> {
        ensure_parent(output_path)?;
        let csv_err = |e: csv::Error| SmatraderError::Data {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(csv_err)?;
        wtr.write_record(CLEAN_COLUMNS).map_err(csv_err)?;
        for s in series {
            for bar in &s.bars {
                wtr.write_record([
                    bar.date.format("%Y-%m-%d").to_string(),
                    s.symbol.clone(),
                    bar.open.to_string(),
                    bar.high.to_string(),
                    bar.low.to_string(),
                    bar.close.to_string(),
                    bar.volume.map(|v| v.to_string()).unwrap_or_default(),
                ])
                .map_err(csv_err)?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<(), SmatraderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// One orders row; exit columns are empty for an open trade.
pub fn order_record(symbol: &str, trade: &Trade) -> Vec<String> {
    let opt = |v: Option<String>| v.unwrap_or_default();
    vec![
        symbol.to_string(),
        trade.entry_date.format("%Y-%m-%d").to_string(),
        trade.entry_price.to_string(),
        trade.quantity.to_string(),
        opt(trade.exit_date().map(|d| d.format("%Y-%m-%d").to_string())),
        opt(trade.exit_price().map(|p| p.to_string())),
        opt(trade.profit_loss().map(|p| p.to_string())),
        opt(trade.bars_held().map(|b| b.to_string())),
    ]
}

pub fn render_validation_report(report: &CleaningReport) -> String {
    let date_or_none = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.to_string()).unwrap_or_else(|| "n/a".to_string())
    };
    let coverage = match report.coverage_days() {
        Some(days) => format!("{} days (~{:.1} months)", days, days as f64 / 30.0),
        None => "n/a".to_string(),
    };

    let mut out = String::new();
    out.push_str("Validation Report\n");
    out.push_str("=================\n");
    out.push_str(&format!("Start date: {}\n", date_or_none(report.start_date)));
    out.push_str(&format!("End date:   {}\n", date_or_none(report.end_date)));
    out.push_str(&format!("Coverage:   {}\n", coverage));
    out.push_str(&format!("Rows before: {}\n", report.rows_before));
    out.push_str(&format!("Rows dropped (bad date): {}\n", report.rows_bad_date));
    out.push_str(&format!("Rows dropped (missing OHLC): {}\n", report.rows_missing_ohlc));
    out.push_str(&format!("Rows dropped (duplicate date): {}\n", report.rows_duplicate));
    out.push_str(&format!("Rows after:  {}\n", report.rows_after));
    out.push_str(&format!("Symbols: {}\n", report.symbols.join(", ")));
    out
}

impl ReportPort for CsvReportAdapter {
    fn write_orders(
        &self,
        results: &[BacktestResult],
        output_path: &Path,
    ) -> Result<(), SmatraderError> {
        ensure_parent(output_path)?;
        let csv_err = |e: csv::Error| SmatraderError::Data {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(csv_err)?;
        wtr.write_record(ORDER_COLUMNS).map_err(csv_err)?;
        for result in results {
            for trade in &result.ledger {
                wtr.write_record(order_record(&result.symbol, trade))
                    .map_err(csv_err)?;
            }
        }
        wtr.flush()?;

        tracing::info!(path = %output_path.display(), "wrote orders");
        Ok(())
    }

    fn write_validation_report(
        &self,
        report: &CleaningReport,
        output_path: &Path,
    ) -> Result<(), SmatraderError> {
        ensure_parent(output_path)?;
        fs::write(output_path, render_validation_report(report))?;
        tracing::info!(path = %output_path.display(), "wrote validation report");
        Ok(())
    }
}
