//! Incident store
//!
//! Holds every incident and applies status transitions. Each transition is a
//! single read-modify-write under the store lock, and the effect it carries
//! (a deployment order or a reporter notice) is built from the same snapshot.

use crate::error::{IncidentError, IncidentResult};
use crate::incident::{Incident, IncidentStatus, NewReport};
use crate::order::DeploymentOrder;
use serde::{Deserialize, Serialize};
use sosnet_core::config::{IncidentConfig, DEFAULT_ORDER_INSTRUCTION};
use sosnet_core::{now_ms, IncidentId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Report acceptance and order wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePolicy {
    /// Reject reports with a blank location or description
    pub require_fields: bool,
    /// Instruction text for every deployment order
    pub order_instruction: String,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            require_fields: true,
            order_instruction: DEFAULT_ORDER_INSTRUCTION.to_string(),
        }
    }
}

impl From<&IncidentConfig> for StorePolicy {
    fn from(config: &IncidentConfig) -> Self {
        Self {
            require_fields: config.require_fields,
            order_instruction: config.order_instruction.clone(),
        }
    }
}

/// Result of a successful `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub incident: Incident,
    /// The one order this validation issued
    pub order: DeploymentOrder,
}

/// Acknowledgment message owed to a registered reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterNotice {
    pub recipient: String,
    pub incident_id: IncidentId,
    pub message: String,
}

/// Result of a successful `acknowledge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledged {
    pub incident: Incident,
    /// `None` for anonymous reporters
    pub notice: Option<ReporterNotice>,
}

#[derive(Debug, Default)]
struct StoreState {
    incidents: HashMap<IncidentId, Incident>,
    /// Most recent first
    order: VecDeque<IncidentId>,
}

/// Incident store shared by reporting and authority sessions
#[derive(Debug, Default)]
pub struct IncidentStore {
    policy: StorePolicy,
    state: Mutex<StoreState>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: StorePolicy) -> Self {
        Self {
            policy,
            state: Mutex::default(),
        }
    }

    pub fn policy(&self) -> &StorePolicy {
        &self.policy
    }

    /// File a new report. The incident starts as `incoming`.
    pub fn report(&self, report: NewReport) -> IncidentResult<Incident> {
        if self.policy.require_fields {
            check_required(&report)?;
        }

        let incident = Incident::from_report(report, now_ms());
        let mut state = self.lock();
        state.order.push_front(incident.id);
        state.incidents.insert(incident.id, incident.clone());

        info!(
            incident_id = %incident.id,
            category = %incident.category,
            reporter = %incident.reporter,
            "SOS report received"
        );
        Ok(incident)
    }

    /// Insert an existing record, e.g. seeded samples. The id must be new.
    pub fn restore(&self, incident: Incident) -> IncidentResult<()> {
        let mut state = self.lock();
        if state.incidents.contains_key(&incident.id) {
            return Err(IncidentError::DuplicateIncident { id: incident.id });
        }
        state.order.push_front(incident.id);
        state.incidents.insert(incident.id, incident);
        Ok(())
    }

    /// `incoming -> validated`, issuing exactly one deployment order.
    pub fn validate(&self, id: IncidentId) -> IncidentResult<Validated> {
        let incident = self.transition(id, IncidentStatus::Validated)?;
        let order = DeploymentOrder::new(
            incident.id,
            incident.target_summary(),
            self.policy.order_instruction.clone(),
            now_ms(),
        );
        Ok(Validated { incident, order })
    }

    /// `incoming -> dismissed`. No order is produced.
    pub fn dismiss(&self, id: IncidentId) -> IncidentResult<Incident> {
        self.transition(id, IncidentStatus::Dismissed)
    }

    /// `incoming | validated -> acknowledged`. A registered reporter is owed
    /// one notice; an anonymous one is not.
    pub fn acknowledge(&self, id: IncidentId) -> IncidentResult<Acknowledged> {
        let incident = self.transition(id, IncidentStatus::Acknowledged)?;
        let notice = incident.reporter.identity().map(|recipient| ReporterNotice {
            recipient: recipient.to_string(),
            incident_id: incident.id,
            message: acknowledgment_message(&incident),
        });
        Ok(Acknowledged { incident, notice })
    }

    fn transition(&self, id: IncidentId, to: IncidentStatus) -> IncidentResult<Incident> {
        let mut state = self.lock();
        let incident = state
            .incidents
            .get_mut(&id)
            .ok_or(IncidentError::IncidentNotFound { id })?;

        let from = incident.status;
        if !from.can_transition_to(to) {
            warn!(incident_id = %id, %from, %to, "Transition rejected");
            return Err(IncidentError::InvalidTransition { id, from, to });
        }

        incident.status = to;
        info!(incident_id = %id, %from, %to, "Incident transitioned");
        Ok(incident.clone())
    }

    pub fn get(&self, id: IncidentId) -> Option<Incident> {
        self.lock().incidents.get(&id).cloned()
    }

    /// All incidents, most recent first.
    pub fn list(&self) -> Vec<Incident> {
        let state = self.lock();
        state
            .order
            .iter()
            .filter_map(|id| state.incidents.get(id).cloned())
            .collect()
    }

    /// Incidents in one status, most recent first.
    pub fn list_by_status(&self, status: IncidentStatus) -> Vec<Incident> {
        let state = self.lock();
        state
            .order
            .iter()
            .filter_map(|id| state.incidents.get(id))
            .filter(|incident| incident.status == status)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_required(report: &NewReport) -> IncidentResult<()> {
    let mut missing = Vec::new();
    if report.location.trim().is_empty() {
        missing.push("location");
    }
    if report.description.trim().is_empty() {
        missing.push("description");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IncidentError::ValidationFailed(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )))
    }
}

fn acknowledgment_message(incident: &Incident) -> String {
    format!(
        "Your {} report at {} has been acknowledged by responders.",
        incident.category, incident.location
    )
}
