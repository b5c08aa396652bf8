use crate::models::signal_score::SignalName;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MaturityError>;

#[derive(Debug, Error)]
pub enum MaturityError {
    /// Snapshot field present but unparseable. Recovered per signal.
    #[error("MALFORMED_INPUT: {signal} signal could not be extracted: {reason}")]
    MalformedInput { signal: SignalName, reason: String },

    #[error("INCOMPLETE_PROFILE: missing signals {missing:?}")]
    IncompleteProfile { missing: Vec<SignalName> },

    #[error("INVALID_SIGNAL: {signal} normalized value {value} is outside [0, 1]")]
    InvalidSignal { signal: SignalName, value: f64 },

    #[error("CONFIGURATION: {0}")]
    Configuration(String),

    #[error("UNKNOWN_TIER: {0}")]
    UnknownTier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

impl MaturityError {
    pub(crate) fn malformed(signal: SignalName, reason: impl Into<String>) -> Self {
        MaturityError::MalformedInput {
            signal,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        MaturityError::Configuration(reason.into())
    }
}
