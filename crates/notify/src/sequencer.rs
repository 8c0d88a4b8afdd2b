//! Delivery sequencer
//!
//! Presents a recipient's unread notifications one at a time. A notification
//! is presented, the recipient acknowledges it, and only then is the next one
//! presented. `shown` is session state and is never persisted.

#![warn(missing_docs)]

use crate::error::{NotifyError, NotifyResult};
use crate::mailbox::Mailbox;
use crate::notification::Notification;
use sosnet_core::NotificationId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Per-session presentation state machine
#[derive(Debug)]
pub struct DeliverySequencer {
    mailbox: Arc<Mailbox>,
    recipient: String,
    /// Notifications acknowledged in this session
    shown: HashSet<NotificationId>,
    /// Notification awaiting acknowledgment; `Some` means busy
    current: Option<Notification>,
}

impl DeliverySequencer {
    /// Start a fresh session for the recipient
    pub fn new(mailbox: Arc<Mailbox>, recipient: impl Into<String>) -> Self {
        Self {
            mailbox,
            recipient: recipient.into(),
            shown: HashSet::new(),
            current: None,
        }
    }

    /// Recipient this session delivers to
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Whether a presentation is awaiting acknowledgment
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Notification currently presented
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Unread notifications not yet shown this session, oldest first
    pub fn pending(&self) -> Vec<Notification> {
        self.mailbox
            .unread_for(&self.recipient)
            .into_iter()
            .filter(|n| !self.shown.contains(&n.id))
            .collect()
    }

    /// Check the mailbox and start presenting if idle
    ///
    /// Returns the notification that became current, or `None` when the
    /// sequencer is already busy or nothing is pending.
    pub fn tick(&mut self) -> Option<Notification> {
        if self.is_busy() {
            return None;
        }
        self.advance()
    }

    /// Acknowledge the current presentation and move to the next one
    ///
    /// Marks the notification read, records it as shown and returns the next
    /// notification now presented, if any. After the last one the sequencer
    /// is idle again.
    pub fn acknowledge(&mut self, id: NotificationId) -> NotifyResult<Option<Notification>> {
        let current = self.current.as_ref().ok_or(NotifyError::NothingPresented)?;
        if current.id != id {
            return Err(NotifyError::NotPresented { id });
        }

        self.mailbox.mark_read(&self.recipient, id);
        self.shown.insert(id);
        self.current = None;
        debug!(recipient = %self.recipient, notification_id = %id, "Presentation acknowledged");

        Ok(self.advance())
    }

    /// Number of notifications acknowledged in this session
    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    fn advance(&mut self) -> Option<Notification> {
        // Re-read so entries delivered mid-run join the tail and cleared ones drop out
        let next = self.pending().into_iter().next()?;
        debug!(recipient = %self.recipient, notification_id = %next.id, "Presenting notification");
        self.current = Some(next.clone());
        Some(next)
    }
}
