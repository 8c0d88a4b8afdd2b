//! Deployment order log
//!
//! Append-only record of the dispatch instructions issued when an incident
//! is validated. Orders are immutable once appended.

use serde::{Deserialize, Serialize};
use sosnet_core::{IncidentId, OrderId};
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Deployment order issued on validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOrder {
    /// Unique order identifier
    pub id: OrderId,
    /// Incident this order responds to
    pub incident_id: IncidentId,
    /// `"<category> @ <location>"` of the source incident
    pub target: String,
    /// Instruction for the responding team
    pub instruction: String,
    /// Issued timestamp (Unix epoch milliseconds)
    pub issued_at: u64,
}

impl DeploymentOrder {
    pub fn new(incident_id: IncidentId, target: String, instruction: String, issued_at: u64) -> Self {
        Self {
            id: OrderId::generate(),
            incident_id,
            target,
            instruction,
            issued_at,
        }
    }
}

/// Append-only order log
#[derive(Debug, Default)]
pub struct OrderLog {
    /// Most recent first
    orders: RwLock<VecDeque<DeploymentOrder>>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the front of the visible sequence.
    pub fn append(&self, order: DeploymentOrder) {
        info!(
            order_id = %order.id,
            incident_id = %order.incident_id,
            target = %order.target,
            "Deployment order issued"
        );
        self.orders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push_front(order);
    }

    /// All orders, most recent first.
    pub fn list(&self) -> Vec<DeploymentOrder> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
