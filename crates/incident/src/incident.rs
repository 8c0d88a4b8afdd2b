//! Incident records and the status machine.

use serde::{Deserialize, Serialize};
use sosnet_core::IncidentId;
use std::fmt;

/// Incident lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    /// Reported, awaiting triage
    Incoming,
    /// Confirmed by an authority; a deployment order was issued
    Validated,
    /// Rejected by an authority
    Dismissed,
    /// Acknowledged back to the reporter
    Acknowledged,
}

impl IncidentStatus {
    /// Check if state is terminal (dismissed or acknowledged)
    pub fn is_terminal(&self) -> bool {
        matches!(self, IncidentStatus::Dismissed | IncidentStatus::Acknowledged)
    }

    /// Check if transition to new state is valid
    pub fn can_transition_to(&self, new_status: IncidentStatus) -> bool {
        match (self, new_status) {
            // From Incoming
            (IncidentStatus::Incoming, IncidentStatus::Validated) => true,
            (IncidentStatus::Incoming, IncidentStatus::Dismissed) => true,
            (IncidentStatus::Incoming, IncidentStatus::Acknowledged) => true,
            // From Validated
            (IncidentStatus::Validated, IncidentStatus::Acknowledged) => true,
            // Terminal states cannot transition
            (IncidentStatus::Dismissed, _) => false,
            (IncidentStatus::Acknowledged, _) => false,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Incoming => "incoming",
            IncidentStatus::Validated => "validated",
            IncidentStatus::Dismissed => "dismissed",
            IncidentStatus::Acknowledged => "acknowledged",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who filed the report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reporter {
    /// Unauthenticated device; carries a display tag such as "Citizen (Device)"
    AnonymousDevice(String),
    /// Directory identity; receives acknowledgment notifications
    Registered(String),
}

impl Reporter {
    /// Mailbox owner for acknowledgments, if any.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Reporter::AnonymousDevice(_) => None,
            Reporter::Registered(identity) => Some(identity),
        }
    }
}

impl fmt::Display for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporter::AnonymousDevice(tag) => f.write_str(tag),
            Reporter::Registered(identity) => f.write_str(identity),
        }
    }
}

/// Fields supplied by a reporting actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport {
    /// Incident category, e.g. "Medical", "Fire", "Flood"
    pub category: String,
    /// Free text or "lat,lon"
    pub location: String,
    pub description: String,
    /// Declared need, e.g. "Immediate Transport"
    pub need: String,
    pub reporter: Reporter,
}

/// Incident record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub category: String,
    pub location: String,
    pub description: String,
    pub need: String,
    pub reporter: Reporter,
    /// Creation timestamp (Unix epoch milliseconds)
    pub created_at: u64,
    pub status: IncidentStatus,
}

impl Incident {
    /// Build an incoming incident with a fresh identifier.
    pub fn from_report(report: NewReport, created_at: u64) -> Self {
        Self {
            id: IncidentId::generate(),
            category: report.category,
            location: report.location,
            description: report.description,
            need: report.need,
            reporter: report.reporter,
            created_at,
            status: IncidentStatus::Incoming,
        }
    }

    /// `"<category> @ <location>"`, or `"Unknown"` when the category is blank.
    pub fn target_summary(&self) -> String {
        let category = self.category.trim();
        if category.is_empty() {
            "Unknown".to_string()
        } else {
            format!("{} @ {}", category, self.location.trim())
        }
    }
}
