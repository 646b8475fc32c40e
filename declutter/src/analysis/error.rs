//! Analysis error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while analyzing an image
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Client could not be constructed (unknown provider, missing key)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification shown to the user and written to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The service did not answer usefully
    TransportError,
    /// The service answered with output that fails the schema
    MalformedResponse,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::TransportError => write!(f, "TransportError"),
            ErrorKind::MalformedResponse => write!(f, "MalformedResponse"),
        }
    }
}

impl AnalysisError {
    /// Map a reqwest failure, keeping timeouts distinct
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AnalysisError::Timeout(timeout)
        } else {
            AnalysisError::Network(err)
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        AnalysisError::MalformedResponse(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            AnalysisError::Timeout(_)
            | AnalysisError::Network(_)
            | AnalysisError::Api { .. }
            | AnalysisError::Config(_) => ErrorKind::TransportError,
        }
    }

    /// Check if the service never produced a usable answer
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::TransportError
    }
}
