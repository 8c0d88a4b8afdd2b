//! Coordinator service object

use crate::advisory::{AdvisoryBoard, Hazard, Shelter};
use crate::error::{CoordinatorError, CoordinatorResult};
use crate::seed::sample_incidents;
use sosnet_core::{now_ms, DeliveryConfig, IncidentId, NotificationId, SosConfig};
use sosnet_directory::{Directory, Principal, Profile, Secret};
use sosnet_incident::{
    DeploymentOrder, Incident, IncidentError, IncidentStatus, IncidentStore, NewReport, OrderLog,
    Reporter, StorePolicy,
};
use sosnet_notify::{
    DeliverySession, Mailbox, Notification, NotifyResult, Presentation, SessionReport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Identity recorded for permission failures without a caller.
const ANONYMOUS_CALLER: &str = "anonymous";

/// Owns every SOSNet component; cheap to clone, clones share state.
#[derive(Debug, Clone)]
pub struct Coordinator {
    directory: Arc<Directory>,
    incidents: Arc<IncidentStore>,
    orders: Arc<OrderLog>,
    mailbox: Arc<Mailbox>,
    advisories: Arc<AdvisoryBoard>,
    delivery: DeliveryConfig,
}

impl Coordinator {
    /// Empty coordinator with default policies.
    pub fn new() -> Self {
        Self::assemble(&SosConfig::default())
    }

    /// Build from validated configuration, creating the bootstrap admin and
    /// sample incidents when configured.
    pub fn from_config(config: &SosConfig) -> CoordinatorResult<Self> {
        config.validate()?;
        let coordinator = Self::assemble(config);

        if let Some(admin) = &config.directory.bootstrap_admin {
            coordinator
                .directory
                .register_admin(&admin.identity, Secret::new(admin.secret.as_str()))?;
            info!(identity = %admin.identity, "Bootstrap admin registered");
        }

        if config.incidents.seed_samples {
            for incident in sample_incidents(now_ms()) {
                coordinator.incidents.restore(incident)?;
            }
            info!(count = coordinator.incidents.len(), "Sample incidents seeded");
        }

        Ok(coordinator)
    }

    fn assemble(config: &SosConfig) -> Self {
        Self {
            directory: Arc::new(Directory::new()),
            incidents: Arc::new(IncidentStore::with_policy(StorePolicy::from(&config.incidents))),
            orders: Arc::new(OrderLog::new()),
            mailbox: Arc::new(Mailbox::with_topic_capacity(config.delivery.channel_capacity)),
            advisories: Arc::new(AdvisoryBoard::from_config(&config.advisories)),
            delivery: config.delivery.clone(),
        }
    }

    // --- accounts ---

    /// Sign up a citizen.
    pub fn register(
        &self,
        identity: &str,
        secret: Secret,
        profile: Profile,
    ) -> CoordinatorResult<Principal> {
        Ok(self.directory.register(identity, secret, profile)?)
    }

    pub fn authenticate(&self, identity: &str, secret: &Secret) -> CoordinatorResult<Principal> {
        Ok(self.directory.authenticate(identity, secret)?)
    }

    // --- reporting ---

    /// File an SOS report.
    ///
    /// Anonymous device reports need no caller. A report filed under a
    /// registered identity must come from that principal.
    pub fn report(
        &self,
        caller: Option<&Principal>,
        report: NewReport,
    ) -> CoordinatorResult<Incident> {
        if let Reporter::Registered(identity) = &report.reporter {
            match caller {
                Some(principal) if principal.identity == *identity => {}
                _ => {
                    let caller = caller.map_or(ANONYMOUS_CALLER, |p| p.identity.as_str());
                    warn!(caller, reporter = %identity, "Report under another identity denied");
                    return Err(CoordinatorError::PermissionDenied {
                        identity: caller.to_string(),
                        operation: "report under another identity",
                    });
                }
            }
            if !self.directory.contains(identity) {
                return Err(IncidentError::ValidationFailed(format!(
                    "unknown reporter {}",
                    identity
                ))
                .into());
            }
        }
        Ok(self.incidents.report(report)?)
    }

    // --- authority ---

    /// Validate an incoming incident and issue its deployment order.
    pub fn validate(
        &self,
        principal: &Principal,
        id: IncidentId,
    ) -> CoordinatorResult<(Incident, DeploymentOrder)> {
        require_authority(principal, "validate")?;
        let validated = self.incidents.validate(id)?;
        self.orders.append(validated.order.clone());
        Ok((validated.incident, validated.order))
    }

    pub fn dismiss(&self, principal: &Principal, id: IncidentId) -> CoordinatorResult<Incident> {
        require_authority(principal, "dismiss")?;
        Ok(self.incidents.dismiss(id)?)
    }

    /// Acknowledge an incident and notify its reporter when registered.
    ///
    /// Returns the notification delivered, if any.
    pub fn acknowledge(
        &self,
        principal: &Principal,
        id: IncidentId,
    ) -> CoordinatorResult<(Incident, Option<Notification>)> {
        require_authority(principal, "acknowledge")?;
        let acknowledged = self.incidents.acknowledge(id)?;
        let notification = acknowledged.notice.map(|notice| {
            self.mailbox
                .deliver_message(&notice.recipient, notice.incident_id, notice.message)
        });
        Ok((acknowledged.incident, notification))
    }

    pub fn list_orders(&self, principal: &Principal) -> CoordinatorResult<Vec<DeploymentOrder>> {
        require_authority(principal, "list orders")?;
        Ok(self.orders.list())
    }

    /// Every incident, most recent first.
    pub fn list_incidents(&self) -> Vec<Incident> {
        self.incidents.list()
    }

    /// Triage queue: incoming incidents only, most recent first.
    pub fn list_incoming(&self) -> Vec<Incident> {
        self.incidents.list_by_status(IncidentStatus::Incoming)
    }

    // --- mailbox ---

    pub fn list_notifications_for(
        &self,
        principal: &Principal,
        recipient: &str,
    ) -> CoordinatorResult<Vec<Notification>> {
        require_owner(principal, recipient, "read notifications")?;
        Ok(self.mailbox.list_for(recipient))
    }

    /// Mark one notification read. Unknown ids are a no-op.
    pub fn mark_notification_read(
        &self,
        principal: &Principal,
        recipient: &str,
        id: NotificationId,
    ) -> CoordinatorResult<()> {
        require_owner(principal, recipient, "mark notifications read")?;
        self.mailbox.mark_read(recipient, id);
        Ok(())
    }

    /// Empty the recipient's mailbox. Returns how many were removed.
    pub fn clear_notifications_for(
        &self,
        principal: &Principal,
        recipient: &str,
    ) -> CoordinatorResult<usize> {
        require_owner(principal, recipient, "clear notifications")?;
        Ok(self.mailbox.clear_all(recipient))
    }

    /// Open a delivery session on the principal's own mailbox.
    pub fn open_delivery_session(&self, principal: &Principal) -> DeliverySession {
        DeliverySession::open(
            Arc::clone(&self.mailbox),
            principal.identity.as_str(),
            Duration::from_millis(self.delivery.poll_interval_ms),
        )
    }

    /// Open a session and run it on the runtime.
    ///
    /// Must be called from within a tokio runtime. Dropping the returned
    /// receiver ends the session.
    pub fn spawn_delivery(
        &self,
        principal: &Principal,
    ) -> (
        mpsc::Receiver<Presentation>,
        JoinHandle<NotifyResult<SessionReport>>,
    ) {
        let session = self.open_delivery_session(principal);
        let (tx, rx) = mpsc::channel(self.delivery.channel_capacity);
        (rx, tokio::spawn(session.run(tx)))
    }

    // --- advisories ---

    pub fn active_hazards(&self) -> Vec<Hazard> {
        self.advisories.active_hazards()
    }

    pub fn shelters(&self) -> Vec<Shelter> {
        self.advisories.shelters()
    }

    // --- components ---

    pub fn directory(&self) -> &Arc<Directory> {
        &self.directory
    }

    pub fn incidents(&self) -> &Arc<IncidentStore> {
        &self.incidents
    }

    pub fn orders(&self) -> &Arc<OrderLog> {
        &self.orders
    }

    pub fn mailbox(&self) -> &Arc<Mailbox> {
        &self.mailbox
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn require_authority(principal: &Principal, operation: &'static str) -> CoordinatorResult<()> {
    if principal.is_authority() {
        return Ok(());
    }
    warn!(identity = %principal.identity, operation, "Authority operation denied");
    Err(CoordinatorError::PermissionDenied {
        identity: principal.identity.clone(),
        operation,
    })
}

fn require_owner(
    principal: &Principal,
    recipient: &str,
    operation: &'static str,
) -> CoordinatorResult<()> {
    if principal.identity == recipient {
        return Ok(());
    }
    warn!(identity = %principal.identity, recipient, operation, "Mailbox access denied");
    Err(CoordinatorError::PermissionDenied {
        identity: principal.identity.clone(),
        operation,
    })
}
