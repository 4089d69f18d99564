// Optimistic collection: local first mutations reconciled against remote operations.
//
// Purpose
// - Apply add, update and delete to local state immediately, then commit, replace or roll back
//   once the supplied remote operation settles.
// - Merge realtime pushes into the same state without touching pending markers.
//
// Responsibilities
// - Mark a key pending from the optimistic mutation until the operation settles, on every path.
// - Return local state to a consistent snapshot before an operation error reaches the caller.
// - Publish every change to subscribers.
//
// Boundaries
// - The state lock is never held across an await. The only suspension point of an operation
//   is the remote operation itself (plus the per key queue when same key serialization is on).

use crate::application::errors::OptimisticError;
use crate::application::keyed_locks::{KeyGuard, KeyedLocks};
use crate::application::options::OperationOptions;
use crate::application::realtime::event::RealtimeEvent;
use crate::config::{CollectionConfig, ResyncPolicy, RollbackStrategy};
use crate::core::identity::{Identifiable, TemporaryKey};
use crate::core::ports::{Notification, NotificationKind, Notifier};
use crate::core::state::{CollectionState, PendingId};
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, warn};

pub const ADD_FAILED: &str = "Operation failed";
pub const UPDATE_FAILED: &str = "Update failed";
pub const DELETE_FAILED: &str = "Delete failed";

pub type Snapshot<T> = Arc<Vec<T>>;

pub struct OptimisticCollection<T: Identifiable> {
    inner: Arc<Inner<T>>,
}

struct Inner<T: Identifiable> {
    state: RwLock<CollectionState<T>>,
    changes: watch::Sender<Snapshot<T>>,
    notifier: Arc<dyn Notifier>,
    locks: KeyedLocks<T::Key>,
    config: CollectionConfig,
}

impl<T: Identifiable> Clone for OptimisticCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> OptimisticCollection<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    pub fn new(initial: Vec<T>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_config(initial, notifier, CollectionConfig::default())
    }

    pub fn with_config(
        initial: Vec<T>,
        notifier: Arc<dyn Notifier>,
        config: CollectionConfig,
    ) -> Self {
        let state = CollectionState::new(initial);
        let (changes, _) = watch::channel(Arc::new(state.snapshot()));
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                changes,
                notifier,
                locks: KeyedLocks::new(),
                config,
            }),
        }
    }

    pub fn config(&self) -> CollectionConfig {
        self.inner.config
    }

    pub fn items(&self) -> Vec<T> {
        self.read().snapshot()
    }

    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// True while an add, update or delete started through this collection is in flight
    /// for `key`.
    pub fn is_optimistic(&self, key: &T::Key) -> bool {
        self.read().is_pending(key)
    }

    pub fn pending_keys(&self) -> Vec<T::Key> {
        self.read().pending_keys()
    }

    /// Observes the items after every change. The receiver starts at the current items.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.inner.changes.subscribe()
    }

    /// Updates `key` locally with `patch`, then reconciles with the result of `operation`.
    ///
    /// `patch` runs on a copy outside the state lock, so it may read the collection. It
    /// cannot change the key of the entity. On failure the collection is rolled back
    /// according to the configured [`RollbackStrategy`].
    pub async fn update_optimistic<R, E, F, Fut>(
        &self,
        key: T::Key,
        patch: impl FnOnce(&mut T),
        operation: F,
        options: OperationOptions<R, T, E>,
    ) -> Result<R, OptimisticError<T::Key, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: Clone + Into<T>,
    {
        let _queued = self.queue(&key).await;
        let OperationOptions {
            on_success,
            on_error,
            success_message,
            error_message,
            loading_message,
        } = options;

        let Some(mut patched) = self.get(&key) else {
            return Err(OptimisticError::NotFoundForUpdate(key));
        };
        patch(&mut patched);
        patched.set_key(key.clone());

        let (original, previous, pending) = {
            let mut state = self.write();
            let original = state.snapshot();
            let Some(entry) = state.get_mut(&key) else {
                return Err(OptimisticError::NotFoundForUpdate(key));
            };
            let previous = std::mem::replace(entry, patched);
            let pending = state.mark_pending(key.clone());
            (original, previous, pending)
        };
        self.publish();
        debug!(key = ?key, "optimistic update applied");
        let mut in_flight = InFlight::begin(self, key.clone(), pending, loading_message, false);

        match operation().await {
            Ok(result) => {
                let replaced = self.mutate(|state| state.replace(&key, result.clone().into()));
                if !replaced {
                    debug!(key = ?key, "updated entity was removed while in flight");
                }
                in_flight.settle();
                if let Some(message) = success_message {
                    self.inner.notifier.success(&message);
                }
                if let Some(callback) = on_success {
                    callback(&result);
                }
                Ok(result)
            }
            Err(error) => {
                let rollback = self.inner.config.rollback;
                self.mutate(|state| match rollback {
                    RollbackStrategy::Snapshot => state.replace_all(original.clone()),
                    RollbackStrategy::Entry => {
                        state.replace(&key, previous);
                    }
                });
                in_flight.settle();
                warn!(key = ?key, ?rollback, "optimistic update rolled back");
                self.inner
                    .notifier
                    .error(error_message.as_deref().unwrap_or(UPDATE_FAILED));
                if let Some(callback) = on_error {
                    callback(&error, &original);
                }
                Err(OptimisticError::Operation(error))
            }
        }
    }

    /// Removes `key` locally, then reconciles with the result of `operation`.
    pub async fn delete_optimistic<E, F, Fut>(
        &self,
        key: T::Key,
        operation: F,
        options: OperationOptions<(), T, E>,
    ) -> Result<(), OptimisticError<T::Key, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let _queued = self.queue(&key).await;
        let OperationOptions {
            on_success,
            on_error,
            success_message,
            error_message,
            loading_message,
        } = options;

        let (original, index, removed, pending) = {
            let mut state = self.write();
            let original = state.snapshot();
            let Some((index, removed)) = state.remove(&key) else {
                return Err(OptimisticError::NotFoundForDeletion(key));
            };
            let pending = state.mark_pending(key.clone());
            (original, index, removed, pending)
        };
        self.publish();
        debug!(key = ?key, "optimistic delete applied");
        let mut in_flight = InFlight::begin(self, key.clone(), pending, loading_message, false);

        match operation().await {
            Ok(()) => {
                in_flight.settle();
                if let Some(message) = success_message {
                    self.inner.notifier.success(&message);
                }
                if let Some(callback) = on_success {
                    callback(&());
                }
                Ok(())
            }
            Err(error) => {
                let rollback = self.inner.config.rollback;
                self.mutate(|state| match rollback {
                    RollbackStrategy::Snapshot => state.replace_all(original.clone()),
                    // a realtime push may have brought the entity back already
                    RollbackStrategy::Entry if !state.contains(&key) => {
                        state.insert_at(index, removed)
                    }
                    RollbackStrategy::Entry => {}
                });
                in_flight.settle();
                warn!(key = ?key, ?rollback, "optimistic delete rolled back");
                self.inner
                    .notifier
                    .error(error_message.as_deref().unwrap_or(DELETE_FAILED));
                if let Some(callback) = on_error {
                    callback(&error, &original);
                }
                Err(OptimisticError::Operation(error))
            }
        }
    }

    /// Upserts a pushed entity: replaced in place when known, prepended otherwise.
    pub fn add_from_realtime(&self, item: T) {
        self.mutate(|state| state.upsert(item));
    }

    /// Replaces a known entity in place. Unknown keys are ignored; returns whether anything
    /// changed.
    pub fn update_from_realtime_item(&self, item: T) -> bool {
        let key = item.key();
        let replaced = self.write().replace(&key, item);
        if replaced {
            self.publish();
        }
        replaced
    }

    pub fn remove_from_realtime(&self, key: &T::Key) -> bool {
        let removed = self.write().remove(key).is_some();
        if removed {
            self.publish();
        }
        removed
    }

    /// Replaces every item. Pending markers are handled per the configured [`ResyncPolicy`].
    pub fn update_from_realtime(&self, items: Vec<T>) {
        let policy = self.inner.config.resync_pending;
        self.mutate(|state| {
            state.replace_all(items);
            match policy {
                ResyncPolicy::Keep => {}
                ResyncPolicy::Clear => state.clear_pending(),
                ResyncPolicy::Reconcile => state.reconcile_pending(),
            }
        });
        debug!(?policy, "collection resynced");
    }

    pub fn apply_realtime(&self, event: RealtimeEvent<T>) {
        match event {
            RealtimeEvent::Inserted(item) => self.add_from_realtime(item),
            RealtimeEvent::Updated(item) => {
                self.update_from_realtime_item(item);
            }
            RealtimeEvent::Deleted(key) => {
                self.remove_from_realtime(&key);
            }
            RealtimeEvent::Resynced(items) => self.update_from_realtime(items),
        }
    }

    async fn queue(&self, key: &T::Key) -> Option<KeyGuard<'_, T::Key>> {
        if self.inner.config.serialize_same_key {
            Some(self.inner.locks.acquire(key).await)
        } else {
            None
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CollectionState<T>> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CollectionState<T>> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = self.read().snapshot();
        self.inner.changes.send_replace(Arc::new(snapshot));
    }

    fn mutate<O>(&self, change: impl FnOnce(&mut CollectionState<T>) -> O) -> O {
        let out = {
            let mut state = self.write();
            change(&mut *state)
        };
        self.publish();
        out
    }

    fn notify(&self, kind: NotificationKind, message: &str) {
        self.inner.notifier.notify(Notification::new(kind, message));
    }
}

impl<T> OptimisticCollection<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
    T::Key: TemporaryKey,
{
    /// Prepends `item` under a temporary key, then swaps it for the entity `operation` returns.
    ///
    /// On failure the temporary entry is removed without a trace.
    pub async fn add_optimistic<R, E, F, Fut>(
        &self,
        mut item: T,
        operation: F,
        options: OperationOptions<R, T, E>,
    ) -> Result<R, OptimisticError<T::Key, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: Clone + Into<T>,
    {
        let OperationOptions {
            on_success,
            on_error,
            success_message,
            error_message,
            loading_message,
        } = options;

        let (temporary_key, original, pending) = self.mutate(|state| {
            let original = state.snapshot();
            let temporary_key = loop {
                let candidate = T::Key::temporary();
                if !state.contains(&candidate) && !state.is_pending(&candidate) {
                    break candidate;
                }
            };
            item.set_key(temporary_key.clone());
            let pending = state.mark_pending(temporary_key.clone());
            state.prepend(item);
            (temporary_key, original, pending)
        });
        debug!(key = ?temporary_key, "optimistic add applied");
        let mut in_flight =
            InFlight::begin(self, temporary_key.clone(), pending, loading_message, true);

        match operation().await {
            Ok(result) => {
                let created: T = result.clone().into();
                let created_key = created.key();
                self.mutate(|state| {
                    state.remove(&temporary_key);
                    state.prepend(created);
                });
                in_flight.settle();
                debug!(
                    temporary = ?temporary_key,
                    key = ?created_key,
                    "optimistic add confirmed"
                );
                if let Some(message) = success_message {
                    self.inner.notifier.success(&message);
                }
                if let Some(callback) = on_success {
                    callback(&result);
                }
                Ok(result)
            }
            Err(error) => {
                self.mutate(|state| {
                    state.remove(&temporary_key);
                });
                in_flight.settle();
                warn!(key = ?temporary_key, "optimistic add rolled back");
                self.inner
                    .notifier
                    .error(error_message.as_deref().unwrap_or(ADD_FAILED));
                if let Some(callback) = on_error {
                    callback(&error, &original);
                }
                Err(OptimisticError::Operation(error))
            }
        }
    }
}

/// Pending marker of one operation. Unmarks on drop, so a future dropped
/// mid flight does not leave the key pending forever.
struct InFlight<'a, T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    collection: &'a OptimisticCollection<T>,
    key: T::Key,
    pending: PendingId,
    loading_message: Option<String>,
    discard_on_abandon: bool,
    settled: bool,
}

impl<'a, T> InFlight<'a, T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    fn begin(
        collection: &'a OptimisticCollection<T>,
        key: T::Key,
        pending: PendingId,
        loading_message: Option<String>,
        discard_on_abandon: bool,
    ) -> Self {
        if let Some(message) = &loading_message {
            collection.notify(NotificationKind::Loading, message);
        }
        Self {
            collection,
            key,
            pending,
            loading_message,
            discard_on_abandon,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
        if let Some(message) = self.loading_message.take() {
            self.collection.notify(NotificationKind::Dismiss, &message);
        }
    }
}

impl<T> Drop for InFlight<'_, T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let abandoned = !self.settled;
        if abandoned {
            warn!(key = ?self.key, "optimistic operation dropped before settling");
            self.settle();
        }
        let discard = abandoned && self.discard_on_abandon;
        let removed = {
            let mut state = self.collection.write();
            state.unmark_pending(&self.key, self.pending);
            discard && state.remove(&self.key).is_some()
        };
        if removed {
            self.collection.publish();
        }
    }
}
