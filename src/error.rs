//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-port failures are
//! never represented here: a refused or unresolvable port is reported as data
//! on its [`PortResult`](crate::scanner::PortResult).

use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a scan request before any scanning begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid port range {start}-{end}: ports must satisfy 1 <= start <= end <= 65535")]
    InvalidRange { start: u32, end: u32 },

    #[error("host must not be empty")]
    EmptyHost,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Engine-level failures that abort a whole scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no async runtime available to host the worker pool: {0}")]
    Runtime(String),

    #[error("scan worker terminated abnormally: {0}")]
    WorkerFailed(String),
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory for this platform")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Input(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error. Validation failures get their own
    /// code so scripts can tell a bad request from a failed run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Input(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for CLI handlers.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err: CliError = ValidationError::EmptyHost.into();
        assert_eq!(err.exit_code(), 2);

        let err: CliError = ScanError::Runtime("none".into()).into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_range_message() {
        let err = ValidationError::InvalidRange { start: 10, end: 5 };
        assert!(err.to_string().contains("10-5"));
    }
}
