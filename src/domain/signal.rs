//! Crossover signal generation.
//!
//! A raw signal at bar `i` uses only information available at bar `i`'s close.
//! The series handed to the simulator is lagged by one bar so that a crossover
//! detected at `i` is acted on at `i + 1`.

use std::fmt;

use crate::domain::error::SmatraderError;
use crate::domain::indicator::IndicatorRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    EnterLong,
    ExitLong,
    #[default]
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::EnterLong => write!(f, "enter_long"),
            Signal::ExitLong => write!(f, "exit_long"),
            Signal::Hold => write!(f, "none"),
        }
    }
}

/// `Some(fast > slow)` where both averages are defined. Equality is not above.
pub fn fast_above(sma_fast: &[Option<f64>], sma_slow: &[Option<f64>]) -> Vec<Option<bool>> {
    sma_fast
        .iter()
        .zip(sma_slow)
        .map(|(fast, slow)| match (fast, slow) {
            (Some(f), Some(s)) => Some(f > s),
            _ => None,
        })
        .collect()
}

/// Raw (unlagged) crossover signals.
///
/// A comparison whose predecessor is undefined is a baseline and never
/// produces a signal.
pub fn detect_crossovers(
    sma_fast: &[Option<f64>],
    sma_slow: &[Option<f64>],
) -> Result<Vec<Signal>, SmatraderError> {
    check_lengths(sma_fast, sma_slow)?;
    Ok(crossovers(&fast_above(sma_fast, sma_slow)))
}

/// Shift signals forward by one bar. Index 0 is always `Hold` and the last raw
/// signal is dropped.
pub fn lag_signals(raw: &[Signal]) -> Vec<Signal> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut lagged = Vec::with_capacity(raw.len());
    lagged.push(Signal::Hold);
    lagged.extend_from_slice(&raw[..raw.len() - 1]);
    lagged
}

/// Crossover signals lagged by one bar, ready for the position simulator.
pub fn generate_signal(
    sma_fast: &[Option<f64>],
    sma_slow: &[Option<f64>],
) -> Result<Vec<Signal>, SmatraderError> {
    Ok(lag_signals(&detect_crossovers(sma_fast, sma_slow)?))
}

/// Lagged signals from indicator rows, via the fast and slow SMA columns.
pub fn generate_from_rows(rows: &[IndicatorRow]) -> Result<Vec<Signal>, SmatraderError> {
    let (sma_fast, sma_slow): (Vec<Option<f64>>, Vec<Option<f64>>) =
        rows.iter().map(|row| (row.sma_fast, row.sma_slow)).unzip();
    generate_signal(&sma_fast, &sma_slow)
}

fn crossovers(above: &[Option<bool>]) -> Vec<Signal> {
    let mut signals = Vec::with_capacity(above.len());
    for i in 0..above.len() {
        let prev = if i == 0 { None } else { above[i - 1] };
        let signal = match (prev, above[i]) {
            (Some(false), Some(true)) => Signal::EnterLong,
            (Some(true), Some(false)) => Signal::ExitLong,
            _ => Signal::Hold,
        };
        signals.push(signal);
    }
    signals
}

fn check_lengths(sma_fast: &[Option<f64>], sma_slow: &[Option<f64>]) -> Result<(), SmatraderError> {
    if sma_fast.len() != sma_slow.len() {
        return Err(SmatraderError::invalid_parameter(
            "sma_slow",
            format!(
                "length {} does not match fast series length {}",
                sma_slow.len(),
                sma_fast.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{compute_indicators, compute_sma};
    use crate::domain::ohlcv::{Bar, PriceSeries};
    use crate::domain::strategy::StrategyParams;
    use chrono::NaiveDate;

    fn defined(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn cross_up_and_down() {
        let fast = defined(&[1.0, 3.0, 3.0, 1.0]);
        let slow = defined(&[2.0, 2.0, 2.0, 2.0]);
        let raw = detect_crossovers(&fast, &slow).unwrap();
        assert_eq!(
            raw,
            vec![Signal::Hold, Signal::EnterLong, Signal::Hold, Signal::ExitLong]
        );
    }

    #[test]
    fn equality_is_not_above() {
        // below -> equal: no signal; equal -> above: enter; above -> equal: exit
        let fast = defined(&[1.0, 2.0, 3.0, 2.0]);
        let slow = defined(&[2.0, 2.0, 2.0, 2.0]);
        let raw = detect_crossovers(&fast, &slow).unwrap();
        assert_eq!(
            raw,
            vec![Signal::Hold, Signal::Hold, Signal::EnterLong, Signal::ExitLong]
        );
    }

    #[test]
    fn first_defined_comparison_is_baseline() {
        let fast = vec![None, Some(5.0), Some(5.0)];
        let slow = vec![None, Some(1.0), Some(1.0)];
        let raw = detect_crossovers(&fast, &slow).unwrap();
        assert_eq!(raw, vec![Signal::Hold, Signal::Hold, Signal::Hold]);
    }

    #[test]
    fn undefined_everywhere_is_hold() {
        let fast = vec![None, None, Some(2.0)];
        let slow = vec![None, None, None];
        let raw = detect_crossovers(&fast, &slow).unwrap();
        assert!(raw.iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn lag_shifts_by_one() {
        let raw = vec![Signal::EnterLong, Signal::Hold, Signal::ExitLong, Signal::EnterLong];
        assert_eq!(
            lag_signals(&raw),
            vec![Signal::Hold, Signal::EnterLong, Signal::Hold, Signal::ExitLong]
        );
    }

    #[test]
    fn lag_empty_and_single() {
        assert!(lag_signals(&[]).is_empty());
        assert_eq!(lag_signals(&[Signal::EnterLong]), vec![Signal::Hold]);
    }

    #[test]
    fn generate_is_lagged_detection() {
        let fast = defined(&[1.0, 3.0, 1.0, 3.0, 1.0]);
        let slow = defined(&[2.0, 2.0, 2.0, 2.0, 2.0]);
        let lagged = generate_signal(&fast, &slow).unwrap();
        assert_eq!(lagged[0], Signal::Hold);
        assert_eq!(lagged, lag_signals(&detect_crossovers(&fast, &slow).unwrap()));
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = generate_signal(&defined(&[1.0, 2.0]), &defined(&[1.0])).unwrap_err();
        assert!(matches!(err, SmatraderError::InvalidParameter { .. }));
    }

    #[test]
    fn scenario_closes() {
        let closes = [10.0, 10.0, 10.0, 12.0, 14.0, 9.0, 9.0, 9.0];
        let fast = compute_sma(&closes, 2).unwrap();
        let slow = compute_sma(&closes, 3).unwrap();

        let raw = detect_crossovers(&fast, &slow).unwrap();
        assert_eq!(raw[3], Signal::EnterLong);
        assert_eq!(raw[5], Signal::ExitLong);

        let lagged = generate_signal(&fast, &slow).unwrap();
        let expected = vec![
            Signal::Hold,
            Signal::Hold,
            Signal::Hold,
            Signal::Hold,
            Signal::EnterLong,
            Signal::Hold,
            Signal::ExitLong,
            Signal::Hold,
        ];
        assert_eq!(lagged, expected);
    }

    #[test]
    fn identical_windows_never_cross() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + ((i * 7) % 11) as f64).collect();
        let fast = compute_sma(&closes, 5).unwrap();
        let slow = compute_sma(&closes, 5).unwrap();
        let lagged = generate_signal(&fast, &slow).unwrap();
        assert!(lagged.iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn display_names() {
        assert_eq!(Signal::EnterLong.to_string(), "enter_long");
        assert_eq!(Signal::ExitLong.to_string(), "exit_long");
        assert_eq!(Signal::Hold.to_string(), "none");
    }

    #[test]
    fn rows_and_columns_agree() {
        let closes = [10.0, 10.0, 10.0, 12.0, 14.0, 9.0, 9.0, 9.0, 11.0, 13.0, 13.0];
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: None,
            })
            .collect();
        let series = PriceSeries::new("TEST", bars);
        let params = StrategyParams { fast: 2, slow: 3 };

        let rows = compute_indicators(&series, &params).unwrap();
        let fast = compute_sma(&closes, 2).unwrap();
        let slow = compute_sma(&closes, 3).unwrap();

        assert_eq!(
            generate_from_rows(&rows).unwrap(),
            generate_signal(&fast, &slow).unwrap()
        );
    }
}
