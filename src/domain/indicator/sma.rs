//! Simple Moving Average over closing prices.
//!
//! O(n) sliding window: the running sum adds the newest close and drops the
//! close that leaves the window.
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) values are undefined.

use crate::domain::error::SmatraderError;

pub fn compute_sma(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, SmatraderError> {
    if window == 0 {
        return Err(SmatraderError::invalid_parameter(
            "window",
            "SMA window must be positive",
        ));
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut window_sum = 0.0_f64;

    for (i, &close) in closes.iter().enumerate() {
        window_sum += close;
        if i >= window {
            window_sum -= closes[i - window];
        }

        if i + 1 >= window {
            values.push(Some(window_sum / window as f64));
        } else {
            values.push(None);
        }
    }

    Ok(values)
}
