//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::SmatraderError;
use crate::domain::execution::FillPolicy;
use crate::domain::strategy::SMA_CROSSOVER;
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    match config.get_path("data", "data_file") {
        Some(_) => Ok(()),
        None => Err(SmatraderError::ConfigMissing {
            section: "data".to_string(),
            key: "data_file".to_string(),
        }),
    }
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    let value = config.get_double("backtest", "start_equity", 100_000.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(SmatraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_equity".to_string(),
            reason: "start_equity must be positive".to_string(),
        });
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    validate_strategy_name(config)?;
    positive_int(config, "strategy", "fast")?;
    positive_int(config, "strategy", "slow")?;
    Ok(())
}

pub fn validate_execution_config(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    validate_fill(config)?;
    positive_int(config, "execution", "quantity")?;
    Ok(())
}

/// All sections needed by the `backtest` command.
pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    validate_data_config(config)?;
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;
    validate_execution_config(config)?;
    Ok(())
}

/// Read a required integer that must be at least 1.
pub fn positive_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<i64, SmatraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(SmatraderError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
        }
    }

    match config.get_int(section, key) {
        Some(v) if v > 0 => Ok(v),
        Some(v) => Err(SmatraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be positive, got {}", key, v),
        }),
        None => Err(SmatraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be an integer", key),
        }),
    }
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    match config.get_string("strategy", "name") {
        None => Ok(()),
        Some(name) if name.trim().eq_ignore_ascii_case(SMA_CROSSOVER) => Ok(()),
        Some(name) => Err(SmatraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "name".to_string(),
            reason: format!("unknown strategy '{}' (expected {})", name.trim(), SMA_CROSSOVER),
        }),
    }
}

fn validate_fill(config: &dyn ConfigPort) -> Result<(), SmatraderError> {
    match config.get_string("execution", "fill") {
        None => Ok(()),
        Some(fill) => fill
            .parse::<FillPolicy>()
            .map(|_| ())
            .map_err(|reason| SmatraderError::ConfigInvalid {
                section: "execution".to_string(),
                key: "fill".to_string(),
                reason,
            }),
    }
}
