//! Notification records

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use sosnet_core::{IncidentId, NotificationId};

/// Acknowledgment event queued for one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier
    pub id: NotificationId,
    /// Incident this notification is about
    pub incident_id: IncidentId,
    /// Human-readable message
    pub message: String,
    /// Creation timestamp (Unix epoch milliseconds)
    pub created_at: u64,
    /// Read flag; only ever moves from false to true
    pub read: bool,
}

impl Notification {
    /// Create an unread notification
    pub fn new(incident_id: IncidentId, message: String, created_at: u64) -> Self {
        Self {
            id: NotificationId::generate(),
            incident_id,
            message,
            created_at,
            read: false,
        }
    }
}
