//! Error types for the powersim CLI.

use powersim_core::types::SimError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record or manifest could not be (de)serialised
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generation, registry or runner failure
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    /// Bad command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A requested file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl CliError {
    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
