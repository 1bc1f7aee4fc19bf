use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use tracing::error;

/// Surface for user-visible error messages.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show an error message to the user.
    fn error(&self, message: &str);
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        error!(target: "kg_explorer::notify", text = %message, "User notification");
    }
}

/// A notification waiting to be displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Buffers notifications until the presentation layer drains them.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn error(&self, message: &str) {
        TracingNotifier.error(message);
        let notification = Notification {
            message: message.to_string(),
            created_at: Utc::now(),
        };
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drain_order() {
        let queue = NotificationQueue::new();
        assert!(queue.is_empty());

        queue.error("first");
        queue.error("second");
        assert_eq!(queue.len(), 2);

        let drained: Vec<String> = queue.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(drained, vec!["first", "second"]);
        assert!(queue.is_empty());
    }
}
