//! Domain error types.

/// Top-level error type for candlesignal.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("insufficient data for {instrument}: have {bars} bars, need {minimum}")]
    InsufficientData {
        instrument: String,
        bars: usize,
        minimum: usize,
    },

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

    #[error("candle source error: {reason}")]
    CandleSource { reason: String },

    #[error("invalid instrument identifier: {0:?}")]
    InvalidInstrument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    /// True for the one condition callers treat as "skip this instrument".
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, SignalError::InsufficientData { .. })
    }
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::CandleSource { .. } => 3,
            SignalError::InvalidInstrument(_) => 4,
            SignalError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
