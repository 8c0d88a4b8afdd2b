//! Core error types

use thiserror::Error;

/// Core error type for SOSNet
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for the expected schema
    #[cfg(feature = "toml")]
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but holds out-of-range values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
