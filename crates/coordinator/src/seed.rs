//! Sample reports for drills and demos

use sosnet_core::IncidentId;
use sosnet_incident::{Incident, IncidentStatus, Reporter};

/// Device tag used by the reporting form when nobody is signed in.
pub const DEVICE_TAG: &str = "Citizen (Device)";

const HOUR_MS: u64 = 60 * 60 * 1000;
const TEN_MINUTES_MS: u64 = 10 * 60 * 1000;

/// Two sample incidents, oldest first, timed relative to `now`.
///
/// The validated sample carries no deployment order; it stands for a case
/// handled before the node started.
pub fn sample_incidents(now: u64) -> Vec<Incident> {
    vec![
        Incident {
            id: IncidentId::generate(),
            category: "Medical".to_string(),
            location: "Brgy. San Isidro, 14.5910,120.9870".to_string(),
            description: "Person collapsed near market.".to_string(),
            need: "Immediate Transport".to_string(),
            reporter: Reporter::AnonymousDevice(DEVICE_TAG.to_string()),
            created_at: now.saturating_sub(HOUR_MS),
            status: IncidentStatus::Incoming,
        },
        Incident {
            id: IncidentId::generate(),
            category: "Medical".to_string(),
            location: "EUWI".to_string(),
            description: "Example validated case".to_string(),
            need: "Medical Aid".to_string(),
            reporter: Reporter::AnonymousDevice(DEVICE_TAG.to_string()),
            created_at: now.saturating_sub(TEN_MINUTES_MS),
            status: IncidentStatus::Validated,
        },
    ]
}
