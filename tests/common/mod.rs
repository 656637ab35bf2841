#![allow(dead_code)]

use chrono::NaiveDate;
use smatrader::domain::backtest::BacktestResult;
use smatrader::domain::cleaning::{clean_rows, CleanedData, CleaningReport, RawRow};
use smatrader::domain::error::SmatraderError;
pub use smatrader::domain::ohlcv::{Bar, PriceSeries};
use smatrader::ports::data_port::DataPort;
use smatrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Closes from the reference crossover scenario (fast=2, slow=3).
pub const SCENARIO_CLOSES: [f64; 8] = [10.0, 10.0, 10.0, 12.0, 14.0, 9.0, 9.0, 9.0];

pub struct MockDataPort {
    pub rows: Vec<RawRow>,
    pub default_symbol: String,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            default_symbol: "TEST".to_string(),
            error: None,
        }
    }

    pub fn with_series(mut self, series: &PriceSeries) -> Self {
        for bar in &series.bars {
            self.rows.push(RawRow {
                symbol: Some(series.symbol.clone()),
                date: bar.date.format("%Y-%m-%d").to_string(),
                open: Some(bar.open),
                high: Some(bar.high),
                low: Some(bar.low),
                close: Some(bar.close),
                volume: bar.volume,
            });
        }
        self
    }

    pub fn with_row(mut self, row: RawRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_all(&self) -> Result<CleanedData, SmatraderError> {
        if let Some(reason) = &self.error {
            return Err(SmatraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(clean_rows(self.rows.clone(), &self.default_symbol))
    }
}

/// Captures what would have been written instead of touching the disk.
#[derive(Default)]
pub struct RecordingReportPort {
    pub orders: RefCell<Vec<(PathBuf, Vec<BacktestResult>)>>,
    pub reports: RefCell<Vec<(PathBuf, CleaningReport)>>,
}

impl ReportPort for RecordingReportPort {
    fn write_orders(
        &self,
        results: &[BacktestResult],
        output_path: &Path,
    ) -> Result<(), SmatraderError> {
        self.orders
            .borrow_mut()
            .push((output_path.to_path_buf(), results.to_vec()));
        Ok(())
    }

    fn write_validation_report(
        &self,
        report: &CleaningReport,
        output_path: &Path,
    ) -> Result<(), SmatraderError> {
        self.reports
            .borrow_mut()
            .push((output_path.to_path_buf(), report.clone()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days from 2024-01-01. Opens are offset from closes so
/// fills at the open are distinguishable from the close.
pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + chrono::Duration::days(i as i64),
            open: close + 0.25,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: Some(1_000.0),
        })
        .collect();
    PriceSeries::new(symbol, bars)
}
