//! Scripted field drill
//!
//! Walks one citizen report and one anonymous device report through the
//! authority flow while the citizen has a live delivery session open.

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use sosnet_coordinator::{
    seed::DEVICE_TAG, Coordinator, NewReport, Principal, Profile, Reporter, Secret,
};
use sosnet_core::SosConfig;
use std::time::Duration;
use tracing::info;

const DRILL_CITIZEN: &str = "drill-citizen";
const DRILL_SECRET: &str = "drill-pass";
const PRESENTATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct DrillSummary {
    pub incidents: usize,
    pub incoming: usize,
    pub orders: Vec<String>,
    /// Notification messages the citizen acknowledged, in order
    pub delivered: Vec<String>,
    pub unread_after: usize,
    pub active_hazards: Vec<String>,
    /// Shelter names with their load, most free places first
    pub shelters: Vec<String>,
}

pub async fn run(coordinator: &Coordinator, config: &SosConfig) -> Result<DrillSummary> {
    let admin = authority(coordinator, config)?;
    let citizen = coordinator.register(DRILL_CITIZEN, Secret::from(DRILL_SECRET), Profile::default())?;
    info!(identity = %citizen.identity, "Drill citizen registered");

    let (mut presentations, session) = coordinator.spawn_delivery(&citizen);

    let medical = coordinator.report(Some(&citizen), NewReport {
        category: "Medical".to_string(),
        location: "Zone A".to_string(),
        description: "Elderly resident with chest pain.".to_string(),
        need: "Immediate Transport".to_string(),
        reporter: Reporter::Registered(citizen.identity.clone()),
    })?;
    let fire = coordinator.report(None, NewReport {
        category: "Fire".to_string(),
        location: "Public Market".to_string(),
        description: "Smoke from stall row C.".to_string(),
        need: "Fire Response".to_string(),
        reporter: Reporter::AnonymousDevice(DEVICE_TAG.to_string()),
    })?;

    coordinator.validate(&admin, medical.id)?;
    coordinator.acknowledge(&admin, medical.id)?;
    coordinator.dismiss(&admin, fire.id)?;

    let presentation = tokio::time::timeout(PRESENTATION_TIMEOUT, presentations.recv())
        .await
        .context("timed out waiting for the acknowledgment notice")?
        .ok_or_else(|| anyhow!("delivery session ended early"))?;
    let delivered = vec![presentation.notification.message.clone()];
    presentation.acknowledge();

    // Hang up once the session has nothing left to present
    tokio::time::timeout(PRESENTATION_TIMEOUT, async {
        while coordinator.mailbox().unread_count(&citizen.identity) > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .context("delivery session did not record the acknowledgment")?;
    drop(presentations);
    let report = session.await.context("delivery session panicked")??;
    info!(acknowledged = report.acknowledged.len(), "Drill delivery session closed");

    Ok(DrillSummary {
        incidents: coordinator.list_incidents().len(),
        incoming: coordinator.list_incoming().len(),
        orders: coordinator
            .list_orders(&admin)?
            .into_iter()
            .map(|order| order.target)
            .collect(),
        delivered,
        unread_after: coordinator.mailbox().unread_count(&citizen.identity),
        active_hazards: coordinator
            .active_hazards()
            .into_iter()
            .map(|h| format!("{} ({})", h.kind, h.area))
            .collect(),
        shelters: coordinator
            .shelters()
            .into_iter()
            .map(|s| format!("{} ({}% full)", s.name, s.occupancy_percent()))
            .collect(),
    })
}

fn authority(coordinator: &Coordinator, config: &SosConfig) -> Result<Principal> {
    let Some(admin) = &config.directory.bootstrap_admin else {
        bail!("drill requires [directory] bootstrap_admin");
    };
    Ok(coordinator.authenticate(&admin.identity, &Secret::from(admin.secret.as_str()))?)
}
