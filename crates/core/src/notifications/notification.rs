//! Notification types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transactions::TransactionDocument;

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Error,
}

/// A user-facing notification raised by core services.
///
/// The core never renders these; the app shell implements
/// [`NotificationSink`](super::NotificationSink) and turns them into toasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    /// When present, the shell offers an UNDO action that re-inserts this
    /// document. The store assigns the recreated row a fresh id.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undo: Option<TransactionDocument>,
}

impl Notification {
    /// Creates an informational notification.
    pub fn info(message: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: NotificationKind::Info,
            message: message.to_string(),
            undo: None,
        }
    }

    /// Creates an error notification.
    pub fn error(message: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: NotificationKind::Error,
            message: message.to_string(),
            undo: None,
        }
    }

    /// Creates an informational notification carrying an undo payload.
    pub fn info_with_undo(message: &str, undo: TransactionDocument) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: NotificationKind::Info,
            message: message.to_string(),
            undo: Some(undo),
        }
    }
}
