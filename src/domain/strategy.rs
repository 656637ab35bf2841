//! Strategy parameters for the SMA crossover rule.

use std::fmt;

use crate::domain::error::SmatraderError;

/// The only strategy name accepted in configuration.
pub const SMA_CROSSOVER: &str = "sma_crossover";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyParams {
    pub fast: usize,
    pub slow: usize,
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), SmatraderError> {
        if self.fast == 0 {
            return Err(SmatraderError::invalid_parameter(
                "fast",
                "SMA window lengths must be positive",
            ));
        }
        if self.slow == 0 {
            return Err(SmatraderError::invalid_parameter(
                "slow",
                "SMA window lengths must be positive",
            ));
        }
        Ok(())
    }

    /// fast >= slow: the run proceeds but crossovers may be rare or absent.
    pub fn is_degenerate(&self) -> bool {
        self.fast >= self.slow
    }

    /// Bars needed for a crossover to be detected and then executed.
    pub fn minimum_bars(&self) -> usize {
        self.slow + 1
    }
}

impl fmt::Display for StrategyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({}) x SMA({})", self.fast, self.slow)
    }
}
