//! Delivery errors

#![warn(missing_docs)]

use sosnet_core::NotificationId;
use thiserror::Error;

/// Delivery protocol errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Acknowledgment arrived while nothing was being presented
    #[error("No notification is being presented")]
    NothingPresented,

    /// Acknowledgment names a notification other than the one presented
    #[error("Notification {id} is not the one being presented")]
    NotPresented {
        /// Identifier the recipient tried to acknowledge
        id: NotificationId,
    },
}

/// Result type for delivery operations
pub type NotifyResult<T> = Result<T, NotifyError>;
