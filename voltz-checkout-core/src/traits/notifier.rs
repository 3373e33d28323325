//! User notification (toast) abstraction

use crate::types::{Notification, NotificationLevel};

/// Sink for transient user-facing notifications.
///
/// Frontends render these as toasts; headless frontends may log them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that writes notifications to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                log::info!("{}: {}", notification.title, notification.message);
            }
            NotificationLevel::Error => {
                log::warn!("{}: {}", notification.title, notification.message);
            }
        }
    }
}
