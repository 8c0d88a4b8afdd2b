//! Configuration management for SOSNet.
//!
//! Every section is optional in the TOML file; missing sections fall back
//! to defaults. `SosConfig::validate` rejects values that would break the
//! delivery contract (for example a polling tick that is not sub-second).

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
#[cfg(feature = "toml")]
use std::path::Path;

/// Instruction text attached to deployment orders when none is configured.
pub const DEFAULT_ORDER_INSTRUCTION: &str = "Proceed with caution. Validate on arrival.";

/// Upper bound for the delivery polling tick.
pub const MAX_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SosConfig {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub incidents: IncidentConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub advisories: AdvisoryConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Admin account created at startup, if any.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAccount {
    pub identity: String,
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentConfig {
    /// Reject reports with a blank location or description.
    #[serde(default = "default_require_fields")]
    pub require_fields: bool,
    #[serde(default = "default_order_instruction")]
    pub order_instruction: String,
    /// Seed the store with sample reports at startup.
    #[serde(default)]
    pub seed_samples: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    #[serde(default)]
    pub hazards: Vec<HazardEntry>,
    #[serde(default)]
    pub shelters: Vec<ShelterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEntry {
    pub id: String,
    pub kind: String,
    pub area: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShelterStatus {
    Open,
    Limited,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterEntry {
    pub id: String,
    pub name: String,
    /// Distance as shown to citizens, e.g. "450 m".
    pub distance: String,
    pub status: ShelterStatus,
    pub occupancy: u32,
    pub capacity: u32,
}

fn default_require_fields() -> bool {
    true
}

fn default_order_instruction() -> String {
    DEFAULT_ORDER_INSTRUCTION.to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_channel_capacity() -> usize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_true() -> bool {
    true
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            require_fields: default_require_fields(),
            order_instruction: default_order_instruction(),
            seed_samples: false,
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SosConfig {
    /// Load and validate a TOML configuration file.
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SosConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Preset used by field drills: bootstrap admin, sample reports and
    /// the standard hazard and shelter boards.
    pub fn drill() -> Self {
        Self {
            directory: DirectoryConfig {
                bootstrap_admin: Some(BootstrapAccount {
                    identity: "admin".to_string(),
                    secret: "admin123".to_string(),
                }),
            },
            incidents: IncidentConfig {
                seed_samples: true,
                ..IncidentConfig::default()
            },
            delivery: DeliveryConfig::default(),
            logging: LoggingConfig::default(),
            advisories: AdvisoryConfig {
                hazards: vec![
                    hazard("H1", "Flood", "Zone A", true),
                    hazard("H2", "Landslide", "Brgy. San Roque", false),
                    hazard("H3", "Storm Surge", "Coastal Area", true),
                ],
                shelters: vec![
                    shelter("S1", "Barangay Hall Shelter", "450 m", ShelterStatus::Open, 120, 200),
                    shelter("S2", "Elementary School Gym", "1.2 km", ShelterStatus::Open, 300, 400),
                    shelter("S3", "Community Center", "2.5 km", ShelterStatus::Limited, 180, 200),
                ],
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(admin) = &self.directory.bootstrap_admin {
            if admin.identity.trim().is_empty() || admin.secret.is_empty() {
                return Err(invalid("bootstrap_admin requires identity and secret"));
            }
        }

        let poll = self.delivery.poll_interval_ms;
        if poll == 0 || poll > MAX_POLL_INTERVAL_MS {
            return Err(invalid(format!(
                "delivery.poll_interval_ms must be within 1..={}, got {}",
                MAX_POLL_INTERVAL_MS, poll
            )));
        }
        if self.delivery.channel_capacity == 0 {
            return Err(invalid("delivery.channel_capacity must be positive"));
        }

        if self.logging.level.trim().is_empty() {
            return Err(invalid("logging.level must not be empty"));
        }

        let mut seen = HashSet::new();
        for h in &self.advisories.hazards {
            if !seen.insert(h.id.as_str()) {
                return Err(invalid(format!("duplicate hazard id {}", h.id)));
            }
        }
        seen.clear();
        for s in &self.advisories.shelters {
            if !seen.insert(s.id.as_str()) {
                return Err(invalid(format!("duplicate shelter id {}", s.id)));
            }
            if s.occupancy > s.capacity {
                return Err(invalid(format!(
                    "shelter {} occupancy {} exceeds capacity {}",
                    s.id, s.occupancy, s.capacity
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::InvalidConfig(msg.into())
}

fn hazard(id: &str, kind: &str, area: &str, active: bool) -> HazardEntry {
    HazardEntry {
        id: id.to_string(),
        kind: kind.to_string(),
        area: area.to_string(),
        active,
    }
}

fn shelter(
    id: &str,
    name: &str,
    distance: &str,
    status: ShelterStatus,
    occupancy: u32,
    capacity: u32,
) -> ShelterEntry {
    ShelterEntry {
        id: id.to_string(),
        name: name.to_string(),
        distance: distance.to_string(),
        status,
        occupancy,
        capacity,
    }
}
