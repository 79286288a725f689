//! Notifier for terminal and headless use. Writes notifications to tracing output.

use async_trait::async_trait;
use skmis_application::{Notification, NotificationLevel, Notifier};
use tracing::{info, warn};

/// Notifier that logs each toast instead of rendering it.
#[derive(Clone)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: Notification) {
        let display_ms = u64::try_from(notification.display_for.as_millis()).unwrap_or(u64::MAX);
        match notification.level {
            NotificationLevel::Success => {
                info!(kind = "success", display_ms, "{}", notification.message);
            }
            NotificationLevel::Info => {
                info!(kind = "info", display_ms, "{}", notification.message);
            }
            NotificationLevel::Error => {
                warn!(kind = "error", display_ms, "{}", notification.message);
            }
        }
    }
}
