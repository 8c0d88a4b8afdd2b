//! Structured logging infrastructure for SOSNet.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system with structured output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use sosnet_core::logging;
///
/// logging::init();
/// tracing::info!("Coordinator started");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter_or("info"))
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize the logging system with JSON output for production environments.
///
/// This format is suitable for log aggregation systems and structured log analysis.
/// Log level can be configured via the `RUST_LOG` environment variable.
///
/// # Example
/// ```no_run
/// use sosnet_core::logging;
///
/// logging::init_json();
/// tracing::info!(service = "sosnet-node", "Service started");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(filter_or("info"))
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize logging from the `[logging]` config section.
///
/// `RUST_LOG` still wins over the configured level.
pub fn init_from_config(config: &LoggingConfig) {
    let filter = filter_or(&config.level);
    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .init(),
    }
}

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
