use crate::core::identity::Identifiable;

/// A change pushed by the realtime subscription, already decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent<T: Identifiable> {
    Inserted(T),
    Updated(T),
    Deleted(T::Key),
    /// Full snapshot after a reconnect.
    Resynced(Vec<T>),
}

impl<T: Identifiable> RealtimeEvent<T> {
    pub fn kind(&self) -> &'static str {
        match self {
            RealtimeEvent::Inserted(_) => "inserted",
            RealtimeEvent::Updated(_) => "updated",
            RealtimeEvent::Deleted(_) => "deleted",
            RealtimeEvent::Resynced(_) => "resynced",
        }
    }
}
