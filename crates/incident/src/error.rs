//! Incident errors

use crate::incident::IncidentStatus;
use sosnet_core::IncidentId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IncidentError {
    #[error("Incident not found: {id}")]
    IncidentNotFound { id: IncidentId },

    #[error("Invalid transition for incident {id}: {from} -> {to}")]
    InvalidTransition {
        id: IncidentId,
        from: IncidentStatus,
        to: IncidentStatus,
    },

    /// Required report field missing
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Incident already exists: {id}")]
    DuplicateIncident { id: IncidentId },
}

pub type IncidentResult<T> = Result<T, IncidentError>;
