// src/error.rs
use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("missing broker credentials: set APCA_API_KEY_ID and APCA_API_SECRET_KEY")]
    MissingCredentials,

    #[error("invalid config value {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures inside the broker collaborator.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("broker returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid broker response: {0}")]
    InvalidResponse(String),
}

/// Why a cycle stopped before reaching the executor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no bar data available")]
    DataUnavailable,

    #[error("insufficient history: have {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },
}
