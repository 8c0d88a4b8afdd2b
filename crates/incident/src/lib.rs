//! Incident lifecycle for SOSNet.
//!
//! This crate owns the incident records and the deployment order log:
//! - Incident status machine (`incoming -> validated | dismissed | acknowledged`)
//! - `IncidentStore` with atomic per-incident transitions
//! - `OrderLog`, the append-only record of deployment orders
//!
//! # Transition effects
//!
//! Transitions do not reach into other components. `validate` hands back the
//! `DeploymentOrder` it produced and `acknowledge` hands back the
//! `ReporterNotice` for a registered reporter; the coordinator appends the
//! order to the `OrderLog` and delivers the notice to the reporter's mailbox.
//!
//! # Re-transitions
//!
//! Only the edges of the status machine are accepted. Anything else, including
//! a second `validate` or any call on a dismissed or acknowledged incident,
//! fails with `InvalidTransition` and produces no effect.

pub mod error;
pub mod incident;
pub mod order;
pub mod store;

pub use error::{IncidentError, IncidentResult};
pub use incident::{Incident, IncidentStatus, NewReport, Reporter};
pub use order::{DeploymentOrder, OrderLog};
pub use store::{Acknowledged, IncidentStore, ReporterNotice, StorePolicy, Validated};
