//! Error handling module for the re-encode pipeline

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for probe, synthesis and execution operations
#[derive(Error, Debug)]
pub enum ReencodeError {
    /// Probe process unreachable or exited with a failure status
    #[error("Failed to probe {path}: {message}")]
    ProbeFailed { path: String, message: String },

    /// Probe output did not have the expected shape
    #[error("Malformed probe output: {message}")]
    MalformedOutput { message: String },

    /// File lacks a video or an audio stream
    #[error("No usable audio and/or video streams in {path}")]
    NoUsableStreams { path: String },

    /// Model field set to an out-of-domain value
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    /// Configuration could not be loaded or applied
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External transcode tool failed
    #[error("Execution failed: {message}")]
    Execution { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReencodeError {
    /// File-level failures where the caller should skip the file and move on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReencodeError::ProbeFailed { .. }
                | ReencodeError::MalformedOutput { .. }
                | ReencodeError::NoUsableStreams { .. }
        )
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ReencodeError::MalformedOutput {
            message: message.into(),
        }
    }
}

/// Result type alias for re-encode operations
pub type ReencodeResult<T> = std::result::Result<T, ReencodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ReencodeError::NoUsableStreams { path: "a.mkv".into() }.is_recoverable());
        assert!(ReencodeError::malformed("missing format").is_recoverable());
        assert!(ReencodeError::ProbeFailed {
            path: "a.mkv".into(),
            message: "exit 1".into()
        }
        .is_recoverable());

        let validation: ReencodeError =
            DomainError::ValidationFailed("language must be 3 letters".into()).into();
        assert!(!validation.is_recoverable());
    }

    #[test]
    fn test_display_carries_path() {
        let err = ReencodeError::NoUsableStreams {
            path: "/media/show.mkv".into(),
        };
        assert!(err.to_string().contains("/media/show.mkv"));
    }
}
