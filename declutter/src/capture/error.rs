//! Capture error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while obtaining an image from the user
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The user backed out of selection; not a failure
    #[error("Capture cancelled")]
    Cancelled,

    /// The selected file cannot be sent for analysis
    #[error("{}: {reason}", path.display())]
    Rejected { path: PathBuf, reason: String },
}

impl CaptureError {
    pub fn rejected(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the user simply cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = CaptureError::rejected("/tmp/notes.txt", "not an image file");
        assert_eq!(err.to_string(), "/tmp/notes.txt: not an image file");
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled() {
        assert!(CaptureError::Cancelled.is_cancelled());
    }
}
