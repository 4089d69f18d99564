// Identity of the entities held by an optimistic collection.
//
// Purpose
// - Let the collection find, replace and deduplicate entries without knowing their shape.
// - Produce temporary keys for entities whose real identity is assigned by the backend.

use std::fmt::Debug;
use std::hash::Hash;
use uuid::Uuid;

pub trait Identifiable {
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    fn key(&self) -> Self::Key;

    fn set_key(&mut self, key: Self::Key);
}

/// Keys that can be synthesised locally before the backend assigns a real one.
pub trait TemporaryKey: Sized {
    fn temporary() -> Self;
}

pub const TEMPORARY_KEY_PREFIX: &str = "temp-";

impl TemporaryKey for String {
    fn temporary() -> Self {
        format!("{TEMPORARY_KEY_PREFIX}{}", Uuid::now_v7())
    }
}

impl TemporaryKey for Uuid {
    fn temporary() -> Self {
        Uuid::now_v7()
    }
}
