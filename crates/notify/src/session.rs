//! Async delivery session
//!
//! Drives a [`DeliverySequencer`] for one live recipient session. Each
//! presentation is sent to the session's consumer together with a one-shot
//! acknowledgment handle; the session waits on that handle before moving on.
//!
//! The session wakes on the recipient's mailbox topic and, as a fallback, on
//! a fixed sub-second tick. It ends when the consumer goes away: dropping
//! the presentation receiver ([`SessionEnd::Cancelled`]), or dropping a
//! `Presentation` without acknowledging it ([`SessionEnd::Unacknowledged`]).
//! Whatever was not acknowledged stays unread for the next session.

#![warn(missing_docs)]

use crate::error::NotifyResult;
use crate::mailbox::{Mailbox, MailboxEvent};
use crate::notification::Notification;
use crate::sequencer::DeliverySequencer;
use sosnet_core::NotificationId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// One notification handed to the recipient
#[derive(Debug)]
pub struct Presentation {
    /// Notification being presented
    pub notification: Notification,
    ack: oneshot::Sender<()>,
}

impl Presentation {
    /// Confirm the recipient has seen this notification
    pub fn acknowledge(self) {
        // Session gone means nothing is waiting on the ack
        let _ = self.ack.send(());
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Presentation receiver dropped (navigated off, logged out)
    Cancelled,
    /// A presentation was dropped without being acknowledged
    Unacknowledged,
}

/// Summary returned when a session stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Recipient of the session
    pub recipient: String,
    /// Notifications acknowledged, in presentation order
    pub acknowledged: Vec<NotificationId>,
    /// Reason the session stopped
    pub end: SessionEnd,
}

enum Wake {
    Tick,
    Mailbox(Result<MailboxEvent, RecvError>),
    Hangup,
}

/// Live delivery session for one recipient
#[derive(Debug)]
pub struct DeliverySession {
    mailbox: Arc<Mailbox>,
    sequencer: DeliverySequencer,
    events: broadcast::Receiver<MailboxEvent>,
    poll_interval: Duration,
}

impl DeliverySession {
    /// Open a session; subscribes before the first mailbox read so no
    /// delivery can slip between the two
    pub fn open(mailbox: Arc<Mailbox>, recipient: impl Into<String>, poll_interval: Duration) -> Self {
        let recipient = recipient.into();
        let events = mailbox.subscribe(&recipient);
        Self {
            sequencer: DeliverySequencer::new(Arc::clone(&mailbox), recipient),
            mailbox,
            events,
            poll_interval,
        }
    }

    /// Recipient of this session
    pub fn recipient(&self) -> &str {
        self.sequencer.recipient()
    }

    /// Run until the consumer goes away
    pub async fn run(mut self, presentations: mpsc::Sender<Presentation>) -> NotifyResult<SessionReport> {
        info!(recipient = %self.recipient(), "Delivery session opened");

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut acknowledged = Vec::new();

        loop {
            let mut next = self.sequencer.tick();
            while let Some(notification) = next {
                let id = notification.id;
                let (ack_tx, ack_rx) = oneshot::channel();

                if presentations
                    .send(Presentation {
                        notification,
                        ack: ack_tx,
                    })
                    .await
                    .is_err()
                {
                    return Ok(self.finish(acknowledged, SessionEnd::Cancelled));
                }

                if ack_rx.await.is_err() {
                    return Ok(self.finish(acknowledged, SessionEnd::Unacknowledged));
                }

                acknowledged.push(id);
                next = self.sequencer.acknowledge(id)?;
            }

            let wake = tokio::select! {
                _ = ticker.tick() => Wake::Tick,
                event = self.events.recv() => Wake::Mailbox(event),
                _ = presentations.closed() => Wake::Hangup,
            };

            match wake {
                Wake::Tick => {}
                Wake::Mailbox(Ok(event)) => {
                    debug!(recipient = %self.recipient(), ?event, "Mailbox changed");
                }
                Wake::Mailbox(Err(RecvError::Lagged(skipped))) => {
                    debug!(recipient = %self.recipient(), skipped, "Mailbox topic lagged");
                }
                Wake::Mailbox(Err(RecvError::Closed)) => {
                    // Topics live as long as the mailbox; rejoin rather than spin
                    self.events = self.mailbox.subscribe(self.sequencer.recipient());
                }
                Wake::Hangup => {
                    return Ok(self.finish(acknowledged, SessionEnd::Cancelled));
                }
            }
        }
    }

    fn finish(self, acknowledged: Vec<NotificationId>, end: SessionEnd) -> SessionReport {
        info!(
            recipient = %self.recipient(),
            acknowledged = acknowledged.len(),
            ?end,
            "Delivery session closed"
        );
        SessionReport {
            recipient: self.sequencer.recipient().to_string(),
            acknowledged,
            end,
        }
    }
}
