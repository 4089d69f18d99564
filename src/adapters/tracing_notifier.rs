use crate::core::ports::{Notification, NotificationKind, Notifier};

/// Routes user feedback to the log. Used where no toast surface exists, e.g. the demo binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => tracing::error!(toast = %notification.message, "notify"),
            NotificationKind::Success => tracing::info!(toast = %notification.message, "notify"),
            NotificationKind::Loading | NotificationKind::Dismiss => {
                tracing::debug!(kind = ?notification.kind, toast = %notification.message, "notify")
            }
        }
    }
}
