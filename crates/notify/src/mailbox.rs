//! Per-recipient notification mailbox
//!
//! Each recipient owns one ordered queue; insertion order is delivery order.
//! Every mutation is published on the recipient's broadcast topic so that
//! live delivery sessions wake without polling.

#![warn(missing_docs)]

use crate::notification::Notification;
use sosnet_core::{now_ms, IncidentId, NotificationId};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Default broadcast buffer per recipient topic
pub const DEFAULT_TOPIC_CAPACITY: usize = 64;

/// Mailbox change published to a recipient's topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailboxEvent {
    /// A notification was appended
    Delivered {
        /// New notification
        id: NotificationId,
    },
    /// A notification's read flag was set
    Read {
        /// Notification that was read
        id: NotificationId,
    },
    /// The queue was emptied
    Cleared {
        /// Number of notifications removed
        removed: usize,
    },
}

/// Notification mailbox shared by the coordinator and delivery sessions
#[derive(Debug)]
pub struct Mailbox {
    /// Recipient identity to queue (oldest first)
    queues: RwLock<HashMap<String, Vec<Notification>>>,
    /// Recipient identity to change topic
    topics: Mutex<HashMap<String, broadcast::Sender<MailboxEvent>>>,
    /// Buffer size for new topics
    topic_capacity: usize,
}

impl Mailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self::with_topic_capacity(DEFAULT_TOPIC_CAPACITY)
    }

    /// Create an empty mailbox with a custom topic buffer size
    pub fn with_topic_capacity(topic_capacity: usize) -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
            topics: Mutex::new(HashMap::new()),
            topic_capacity: topic_capacity.max(1),
        }
    }

    /// Append a notification to the recipient's queue, creating it if absent
    pub fn deliver(&self, recipient: &str, notification: Notification) {
        let id = notification.id;
        self.queues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(recipient.to_string())
            .or_default()
            .push(notification);

        info!(recipient, notification_id = %id, "Notification queued");
        self.publish(recipient, MailboxEvent::Delivered { id });
    }

    /// Build an unread notification from a message and deliver it
    pub fn deliver_message(
        &self,
        recipient: &str,
        incident_id: IncidentId,
        message: String,
    ) -> Notification {
        let notification = Notification::new(incident_id, message, now_ms());
        self.deliver(recipient, notification.clone());
        notification
    }

    /// Full queue for the recipient (read and unread), oldest first
    ///
    /// Unknown recipients get an empty list.
    pub fn list_for(&self, recipient: &str) -> Vec<Notification> {
        self.queues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(recipient)
            .cloned()
            .unwrap_or_default()
    }

    /// Unread notifications for the recipient, oldest first
    pub fn unread_for(&self, recipient: &str) -> Vec<Notification> {
        self.queues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(recipient)
            .map(|queue| queue.iter().filter(|n| !n.read).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of unread notifications for the recipient
    pub fn unread_count(&self, recipient: &str) -> usize {
        self.queues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(recipient)
            .map(|queue| queue.iter().filter(|n| !n.read).count())
            .unwrap_or(0)
    }

    /// Set the read flag on one notification
    ///
    /// Idempotent: unknown ids and already-read entries are left alone.
    /// Returns whether the flag changed.
    pub fn mark_read(&self, recipient: &str, id: NotificationId) -> bool {
        let changed = {
            let mut queues = self.queues.write().unwrap_or_else(PoisonError::into_inner);
            match queues
                .get_mut(recipient)
                .and_then(|queue| queue.iter_mut().find(|n| n.id == id))
            {
                Some(notification) if !notification.read => {
                    notification.read = true;
                    true
                }
                _ => false,
            }
        };

        if changed {
            debug!(recipient, notification_id = %id, "Notification read");
            self.publish(recipient, MailboxEvent::Read { id });
        }
        changed
    }

    /// Empty the recipient's queue irreversibly
    ///
    /// Idempotent. Returns the number of notifications removed.
    pub fn clear_all(&self, recipient: &str) -> usize {
        let removed = self
            .queues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(recipient)
            .map(|queue| queue.len())
            .unwrap_or(0);

        if removed > 0 {
            info!(recipient, removed, "Mailbox cleared");
            self.publish(recipient, MailboxEvent::Cleared { removed });
        }
        removed
    }

    /// Subscribe to the recipient's change topic
    pub fn subscribe(&self, recipient: &str) -> broadcast::Receiver<MailboxEvent> {
        self.topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(recipient.to_string())
            .or_insert_with(|| broadcast::channel(self.topic_capacity).0)
            .subscribe()
    }

    fn publish(&self, recipient: &str, event: MailboxEvent) {
        let topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = topics.get(recipient) {
            // Broadcast (ignore errors if no receivers)
            let _ = tx.send(event);
        }
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}
