//! Domain error types.
//!
//! `DataUnavailable` and `InsufficientHistory` are boundary errors: they are
//! raised before signal generation begins and propagate to the caller
//! unchanged. Empty windows, zero signals and zero trades are ordinary
//! results, never errors.

/// Top-level error type for stocksignal.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("no data for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("insufficient history for {ticker}: have {rows} bars, need {minimum}")]
    InsufficientHistory {
        ticker: String,
        rows: usize,
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

    #[error("watchlist error: {reason}")]
    Watchlist { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::Watchlist { .. } => 3,
            SignalError::DataUnavailable { .. } | SignalError::InsufficientHistory { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
