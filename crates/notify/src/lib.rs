//! Notification delivery for SOSNet.
//!
//! This crate provides the per-recipient notification mailbox and the
//! delivery protocol that surfaces mailbox entries to a live session:
//! - `Mailbox`: ordered queue per recipient with read flags and bulk clear
//! - `DeliverySequencer`: presents unread entries one at a time, in creation
//!   order, advancing only on acknowledgment
//! - `DeliverySession`: async driver that wakes on mailbox events (one
//!   broadcast topic per recipient) with a polling tick as a fallback
//!
//! # Guarantees
//!
//! Within one session no notification is presented twice, none is skipped,
//! and presentation order equals creation order. The set of shown
//! notifications lives only as long as the session; a new session starts
//! again from the oldest unread entry.

#![warn(missing_docs)]

pub mod error;
pub mod mailbox;
pub mod notification;
pub mod sequencer;
pub mod session;

pub use error::{NotifyError, NotifyResult};
pub use mailbox::{Mailbox, MailboxEvent};
pub use notification::Notification;
pub use sequencer::DeliverySequencer;
pub use session::{DeliverySession, Presentation, SessionEnd, SessionReport};
