//! Domain error types.

/// Top-level error type for smatrader.
#[derive(Debug, thiserror::Error)]
pub enum SmatraderError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SmatraderError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        SmatraderError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SmatraderError> for std::process::ExitCode {
    fn from(err: &SmatraderError) -> Self {
        let code: u8 = match err {
            SmatraderError::Io(_) => 1,
            SmatraderError::ConfigParse { .. }
            | SmatraderError::ConfigMissing { .. }
            | SmatraderError::ConfigInvalid { .. } => 2,
            SmatraderError::InvalidParameter { .. } => 3,
            SmatraderError::Data { .. } => 4,
            SmatraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
