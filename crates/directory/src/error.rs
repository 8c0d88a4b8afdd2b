//! Error types for directory operations.

use thiserror::Error;

/// Errors that can occur in directory operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Identity already registered (exact, case-sensitive match)
    #[error("Identity already exists: {identity}")]
    DuplicateIdentity { identity: String },

    /// Unknown identity or wrong secret
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Identity or secret missing at signup
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
