//! Core functionality for the SOSNet incident coordination system.
//!
//! This crate provides the fundamental types and utilities shared by the
//! directory, incident, notification and coordinator crates:
//! - Opaque identifiers for incidents, orders and notifications
//! - Wall-clock timestamps
//! - TOML configuration with validation
//! - Structured logging initialization

pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod time;

pub use config::{
    AdvisoryConfig, BootstrapAccount, DeliveryConfig, DirectoryConfig, HazardEntry,
    IncidentConfig, LogFormat, LoggingConfig, ShelterEntry, ShelterStatus, SosConfig,
};
pub use error::{CoreError, Result};
pub use ids::{IncidentId, NotificationId, OrderId};
pub use time::now_ms;
