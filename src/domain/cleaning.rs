//! Raw price rows to clean per-symbol series.
//!
//! Rows with unparseable dates or missing/non-finite OHLC values are dropped,
//! each symbol is sorted ascending by date and duplicate dates are removed
//! keeping the first occurrence. Volume may be absent.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::ohlcv::{Bar, PriceSeries};

/// Date formats tried in order: ISO first, then day-first.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// One input row before cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub symbol: Option<String>,
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_bad_date: usize,
    pub rows_missing_ohlc: usize,
    pub rows_duplicate: usize,
    pub rows_after: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub symbols: Vec<String>,
}

impl CleaningReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_bad_date + self.rows_missing_ohlc + self.rows_duplicate
    }

    /// Calendar days between the first and last kept bar.
    pub fn coverage_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedData {
    /// Keyed by symbol, so iteration is in symbol order.
    pub series: BTreeMap<String, PriceSeries>,
    pub report: CleaningReport,
}

impl CleanedData {
    pub fn into_series(self) -> Vec<PriceSeries> {
        self.series.into_values().collect()
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // Timestamps such as "2024-01-15 00:00:00" keep only the date part.
    let value = value.split_whitespace().next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub fn clean_rows(rows: Vec<RawRow>, default_symbol: &str) -> CleanedData {
    let mut report = CleaningReport {
        rows_before: rows.len(),
        ..CleaningReport::default()
    };
    let mut grouped: BTreeMap<String, Vec<Bar>> = BTreeMap::new();

    for row in rows {
        let Some(date) = parse_date(&row.date) else {
            report.rows_bad_date += 1;
            continue;
        };

        let (Some(open), Some(high), Some(low), Some(close)) = (
            finite(row.open),
            finite(row.high),
            finite(row.low),
            finite(row.close),
        ) else {
            report.rows_missing_ohlc += 1;
            continue;
        };

        let symbol = row
            .symbol
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_symbol.to_string());

        grouped.entry(symbol).or_default().push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume: finite(row.volume),
        });
    }

    let mut series = BTreeMap::new();
    for (symbol, mut bars) in grouped {
        // stable: the first occurrence of a date stays first
        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.dedup_by_key(|b| b.date);
        report.rows_duplicate += before - bars.len();

        if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
            report.start_date = Some(report.start_date.map_or(first.date, |d| d.min(first.date)));
            report.end_date = Some(report.end_date.map_or(last.date, |d| d.max(last.date)));
        }
        report.rows_after += bars.len();
        report.symbols.push(symbol.clone());
        series.insert(symbol.clone(), PriceSeries::new(symbol, bars));
    }

    CleanedData { series, report }
}
