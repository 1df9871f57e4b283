//! Error types for WikiDP.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream payload invalid: {0}")]
    UpstreamPayload(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from the ground-truth data source.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::UpstreamUnavailable(_) | Error::UpstreamPayload(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
