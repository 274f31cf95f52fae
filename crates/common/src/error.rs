//! Common error types for the reachable crates.

use std::fmt;

/// A specialized Result type for reachability operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for reachability operations.
///
/// Probe failures never show up here: a failed probe is simply "not reachable".
/// These variants cover configuration mistakes and checker lifecycle misuse.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Checker is already running")]
    AlreadyRunning,

    #[error("Checker is not running")]
    NotRunning,

    #[error("No tokio runtime available to spawn the poll loop")]
    NoRuntime,

    #[error("Poll task failed: {0}")]
    Task(String),
}

impl Error {
    /// Create a new invalid target error.
    pub fn invalid_target(target: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::InvalidTarget {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new poll task error.
    pub fn task(msg: impl fmt::Display) -> Self {
        Error::Task(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_display() {
        let err = Error::invalid_target("host:abc", "port is not a number");
        assert_eq!(
            err.to_string(),
            "Invalid target \"host:abc\": port is not a number"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
