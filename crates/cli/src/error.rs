//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Input batch file could not be read
    #[error("Failed to read batch file '{path}': {message}")]
    BatchRead { path: String, message: String },

    /// A record line in the batch file could not be parsed
    #[error("Invalid record at {path}:{line}: {message}")]
    BatchParse {
        path: String,
        line: usize,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

#[allow(dead_code)]
impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn batch_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BatchRead {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn batch_parse(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::BatchParse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
