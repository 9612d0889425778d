//! Error types for logger configuration and construction.
//!
//! Configuration errors come from reading or validating options; build errors
//! come from turning a resolved configuration into a working logger.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while constructing a logger from a resolved configuration.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Sink settings failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A file sink could not be created or opened for append
    #[error("Failed to open log file {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extra filter directives could not be parsed
    #[error("Invalid filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
}

/// Convenience type alias for build results.
pub type BuildResult<T> = std::result::Result<T, BuildError>;
