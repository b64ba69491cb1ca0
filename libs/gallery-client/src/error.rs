//! Error types for gallery-client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Gallery search errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid max results: {0} (must be zero or greater)")]
    InvalidMaxResults(i64),

    #[error("PowerShell host '{program}' could not be started: {source}")]
    HostUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by the registry cmdlet, carried verbatim.
    #[error("{0}")]
    Registry(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors raised before any registry call was attempted.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::MissingField(_) | Error::InvalidMaxResults(_))
    }
}
