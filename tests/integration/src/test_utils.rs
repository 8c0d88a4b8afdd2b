//! Shared fixtures for SOSNet scenarios

use sosnet_coordinator::{Coordinator, NewReport, Presentation, Principal, Profile, Reporter, Secret};
use sosnet_core::{BootstrapAccount, SosConfig};
use std::sync::Once;
use tokio::sync::mpsc;
use tokio::time::Duration;

/// Identity of the bootstrap admin in every fixture
pub const ADMIN: &str = "admin";
pub const ADMIN_SECRET: &str = "admin123";

/// Fast tick so fallback polling is exercised without slowing the suite
pub const TEST_POLL_INTERVAL_MS: u64 = 20;

/// Upper bound when waiting on a delivery session
pub const WAIT: Duration = Duration::from_secs(2);

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Coordinator with a bootstrap admin and a fast delivery tick
pub struct TestNode {
    pub coordinator: Coordinator,
    pub admin: Principal,
}

impl TestNode {
    pub fn new() -> Self {
        init_tracing();

        let mut config = SosConfig::default();
        config.directory.bootstrap_admin = Some(BootstrapAccount {
            identity: ADMIN.to_string(),
            secret: ADMIN_SECRET.to_string(),
        });
        config.delivery.poll_interval_ms = TEST_POLL_INTERVAL_MS;

        let coordinator = Coordinator::from_config(&config).unwrap();
        let admin = coordinator
            .authenticate(ADMIN, &Secret::from(ADMIN_SECRET))
            .unwrap();

        Self { coordinator, admin }
    }

    /// Register a citizen with a throwaway secret
    pub fn citizen(&self, identity: &str) -> Principal {
        self.coordinator
            .register(identity, Secret::from(format!("{}-pw", identity)), Profile::default())
            .unwrap()
    }
}

impl Default for TestNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Report filed by a signed-in citizen
pub fn citizen_report(principal: &Principal, category: &str, location: &str) -> NewReport {
    NewReport {
        category: category.to_string(),
        location: location.to_string(),
        description: format!("{} emergency reported at {}", category, location),
        need: "Medical Aid".to_string(),
        reporter: Reporter::Registered(principal.identity.clone()),
    }
}

/// Report filed from a device with nobody signed in
pub fn device_report(category: &str, location: &str) -> NewReport {
    NewReport {
        category: category.to_string(),
        location: location.to_string(),
        description: format!("{} emergency reported at {}", category, location),
        need: "Immediate Transport".to_string(),
        reporter: Reporter::AnonymousDevice("Citizen (Device)".to_string()),
    }
}

/// Next presentation, failing the test if none arrives in time
pub async fn next_presentation(rx: &mut mpsc::Receiver<Presentation>) -> Presentation {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for presentation")
        .expect("delivery session ended")
}

/// Assert that nothing is presented for a few ticks
pub async fn assert_quiet(rx: &mut mpsc::Receiver<Presentation>) {
    let quiet = Duration::from_millis(TEST_POLL_INTERVAL_MS * 5);
    assert!(
        tokio::time::timeout(quiet, rx.recv()).await.is_err(),
        "unexpected presentation"
    );
}
