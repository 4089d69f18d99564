// In memory state of an optimistic collection.
//
// Purpose
// - Hold the ordered entities and the pending markers of in flight operations.
//
// Responsibilities
// - Keep entities unique by key on every insert path.
// - Track pending per operation: a key is pending while any of its marks is alive, and an
//   operation can only unmark its own mark.
//
// Boundaries
// - Purely synchronous. Awaiting remote operations and reconciliation live in the
//   application layer.

use crate::core::identity::Identifiable;
use std::collections::{HashMap, HashSet};

/// Mark of one in flight operation on a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingId(u64);

#[derive(Debug, Clone)]
pub struct CollectionState<T: Identifiable> {
    items: Vec<T>,
    pending: HashMap<T::Key, HashSet<PendingId>>,
    next_pending: u64,
}

impl<T: Identifiable> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending: HashMap::new(),
            next_pending: 0,
        }
    }
}

impl<T: Identifiable> CollectionState<T> {
    /// Seeds the state. Later duplicates of a key are dropped, the first occurrence wins.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: unique_by_key(items),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.items.iter().position(|item| &item.key() == key)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| &item.key() == key)
    }

    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.items.iter_mut().find(|item| &item.key() == key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.position(key).is_some()
    }

    pub fn prepend(&mut self, item: T) {
        let key = item.key();
        self.items.retain(|existing| existing.key() != key);
        self.items.insert(0, item);
    }

    /// Inserts at `index`, clamped to the current length.
    pub fn insert_at(&mut self, index: usize, item: T) {
        let key = item.key();
        self.items.retain(|existing| existing.key() != key);
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub fn remove(&mut self, key: &T::Key) -> Option<(usize, T)> {
        let index = self.position(key)?;
        Some((index, self.items.remove(index)))
    }

    /// Replaces the entry stored under `key` in place. Returns false when `key` is absent.
    ///
    /// The replacement may carry a different key; any other entry already holding
    /// that key is dropped so keys stay unique.
    pub fn replace(&mut self, key: &T::Key, item: T) -> bool {
        let Some(mut index) = self.position(key) else {
            return false;
        };
        let new_key = item.key();
        if &new_key != key {
            if let Some(other) = self.position(&new_key) {
                self.items.remove(other);
                if other < index {
                    index -= 1;
                }
            }
        }
        self.items[index] = item;
        true
    }

    /// Replaces in place when present, prepends otherwise.
    pub fn upsert(&mut self, item: T) {
        match self.position(&item.key()) {
            Some(index) => self.items[index] = item,
            None => self.items.insert(0, item),
        }
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = unique_by_key(items);
    }

    pub fn mark_pending(&mut self, key: T::Key) -> PendingId {
        let id = PendingId(self.next_pending);
        self.next_pending += 1;
        self.pending.entry(key).or_default().insert(id);
        id
    }

    /// Removes one mark. Marks already dropped by a resync are ignored.
    pub fn unmark_pending(&mut self, key: &T::Key, id: PendingId) {
        if let Some(marks) = self.pending.get_mut(key) {
            marks.remove(&id);
            if marks.is_empty() {
                self.pending.remove(key);
            }
        }
    }

    pub fn is_pending(&self, key: &T::Key) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_keys(&self) -> Vec<T::Key> {
        self.pending.keys().cloned().collect()
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Drops pending markers whose key is no longer present among the items.
    pub fn reconcile_pending(&mut self) {
        let present: HashSet<T::Key> = self.items.iter().map(Identifiable::key).collect();
        self.pending.retain(|key, _| present.contains(key));
    }
}

impl<T: Identifiable + Clone> CollectionState<T> {
    pub fn snapshot(&self) -> Vec<T> {
        self.items.clone()
    }
}

fn unique_by_key<T: Identifiable>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.key()))
        .collect()
}
