use anyhow::{bail, Context, Result};
use serde::Serialize;
use sosnet_coordinator::Coordinator;
use sosnet_core::{logging, SosConfig};
use std::path::PathBuf;
use tracing::info;

mod drill;

const NODE_RUNTIME_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    runtime_version: u32,
}

#[derive(Debug, Serialize)]
struct NodeStatus {
    accounts: usize,
    incidents: usize,
    incoming: usize,
    orders: usize,
    active_hazards: usize,
    shelters: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--version-json") {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            runtime_version: NODE_RUNTIME_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let run_drill = args.iter().any(|arg| arg == "--drill");
    let config = match parse_config_path(&args)? {
        Some(path) => SosConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None if run_drill => SosConfig::drill(),
        None => bail!("missing required --config <path> argument"),
    };

    logging::init_from_config(&config.logging);

    let coordinator = Coordinator::from_config(&config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        poll_interval_ms = config.delivery.poll_interval_ms,
        "SOSNet node started"
    );

    if run_drill {
        let summary = drill::run(&coordinator, &config).await?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", serde_json::to_string(&status(&coordinator))?);
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("SOSNet node shutting down");
    Ok(())
}

fn status(coordinator: &Coordinator) -> NodeStatus {
    NodeStatus {
        accounts: coordinator.directory().len(),
        incidents: coordinator.list_incidents().len(),
        incoming: coordinator.list_incoming().len(),
        orders: coordinator.orders().len(),
        active_hazards: coordinator.active_hazards().len(),
        shelters: coordinator.shelters().len(),
    }
}

fn parse_config_path(args: &[String]) -> Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            if let Some(path) = args_iter.next() {
                return Ok(Some(PathBuf::from(path)));
            }
            bail!("--config was provided without a path");
        }
    }
    Ok(None)
}
