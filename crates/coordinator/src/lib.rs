//! SOSNet coordinator
//!
//! Composes the directory, incident store, order log and notification
//! mailbox behind one service object. The coordinator is the only place
//! where a caller's role is checked and where the effects of an incident
//! transition are applied:
//!
//! ```text
//! validate(principal, id)
//!   1. require Role::Admin
//!   2. IncidentStore::validate   (incoming -> validated, builds the order)
//!   3. OrderLog::append          (infallible)
//!
//! acknowledge(principal, id)
//!   1. require Role::Admin
//!   2. IncidentStore::acknowledge (builds the notice for a registered reporter)
//!   3. Mailbox::deliver_message   (infallible, skipped for anonymous devices)
//! ```
//!
//! Step 2 commits under the store lock before step 3 runs, so a rejected
//! transition never leaves an order or a notification behind.

pub mod advisory;
pub mod coordinator;
pub mod error;
pub mod seed;

pub use advisory::{AdvisoryBoard, Hazard, Shelter};
pub use coordinator::Coordinator;
pub use error::{CoordinatorError, CoordinatorResult};

pub use sosnet_directory::{Principal, Profile, Role, Secret};
pub use sosnet_incident::{DeploymentOrder, Incident, IncidentStatus, NewReport, Reporter};
pub use sosnet_notify::{DeliverySession, Notification, Presentation, SessionEnd, SessionReport};
