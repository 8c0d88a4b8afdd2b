//! Coordinator errors

use sosnet_core::CoreError;
use sosnet_directory::DirectoryError;
use sosnet_incident::IncidentError;
use sosnet_notify::NotifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Incident(#[from] IncidentError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    /// Caller's role or identity does not allow the operation
    #[error("Permission denied: {identity} may not {operation}")]
    PermissionDenied {
        identity: String,
        operation: &'static str,
    },
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
