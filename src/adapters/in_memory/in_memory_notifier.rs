// In memory implementation of the Notifier port.
//
// Purpose
// - Record every notification so tests can assert on user feedback.

use crate::core::ports::{Notification, NotificationKind, Notifier};
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
pub struct InMemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self, kind: NotificationKind) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|notification| notification.kind == kind)
            .map(|notification| notification.message)
            .collect()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod in_memory_notifier_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_record_notifications_in_order() {
        let notifier = InMemoryNotifier::new();
        notifier.success("Order created");
        notifier.error("Update failed");
        notifier.notify(Notification::new(NotificationKind::Loading, "Saving"));
        assert_eq!(notifier.all().len(), 3);
        assert_eq!(
            notifier.all()[0],
            Notification::new(NotificationKind::Success, "Order created")
        );
        assert_eq!(notifier.messages(NotificationKind::Error), vec!["Update failed"]);
    }
}
