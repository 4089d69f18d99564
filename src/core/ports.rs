// Ports define what the optimistic core needs from the outside world, without implementing it.
//
// Purpose
// - Describe the notification sink and the remote persistence as traits.
//
// Responsibilities
// - Keep the core independent of any toast system or backend by coding against traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the adapters layer.
//
// Testing guidance
// - Provide in memory implementations for tests and local development.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Loading,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Side effect sink for user feedback. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::new(NotificationKind::Success, message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::new(NotificationKind::Error, message));
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote backend offline")]
    Offline,

    #[error("record not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait RemoteRepository<T: Send + Sync + 'static>: Send + Sync {
    /// Persists a new record and returns it with its backend assigned identity.
    async fn create(&self, draft: T) -> Result<T, RemoteError>;
    async fn update(&self, record: T) -> Result<T, RemoteError>;
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}
