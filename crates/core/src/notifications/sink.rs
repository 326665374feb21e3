//! Notification sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::Notification;

/// Trait for receiving user-facing notifications.
///
/// Implementations translate notifications into platform-specific surfaces
/// (toasts, banners). Core services notify through this trait when an
/// operation fails or produces an undoable effect.
///
/// # Design Rules
///
/// - `notify()` must be fast and non-blocking (no network calls, no store
///   writes)
/// - Failure to deliver must not affect domain operations (best-effort)
pub trait NotificationSink: Send + Sync {
    /// Deliver a single notification.
    fn notify(&self, notification: Notification);
}

/// No-op implementation for tests or contexts without a notification surface.
#[derive(Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _notification: Notification) {
        // Intentionally empty - notifications are discarded
    }
}

/// Mock sink for testing - collects delivered notifications.
#[derive(Clone, Default)]
pub struct MockNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Clears collected notifications.
    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }

    /// Returns the number of collected notifications.
    pub fn len(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.notifications.lock().unwrap().is_empty()
    }
}

impl NotificationSink for MockNotificationSink {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
