// In memory implementation of the RemoteRepository port.
//
// Purpose
// - Stand in for the hosted backend in tests and in the demo binary.
//
// Responsibilities
// - Assign a v7 uuid to created records.
// - Simulate latency and outages through a delay and an offline switch.

use crate::core::identity::Identifiable;
use crate::core::ports::{RemoteError, RemoteRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct InMemoryRemote<T> {
    records: RwLock<HashMap<String, T>>,
    offline: AtomicBool,
    delay_ms: AtomicU64,
}

impl<T> Default for InMemoryRemote<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
        }
    }
}

impl<T> InMemoryRemote<T>
where
    T: Identifiable<Key = String> + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.key(), r)).collect()),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.records.read().await.get(id).cloned()
    }

    async fn round_trip(&self) -> Result<(), RemoteError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Offline);
        }
        Ok(())
    }
}

#[async_trait]
impl<T> RemoteRepository<T> for InMemoryRemote<T>
where
    T: Identifiable<Key = String> + Clone + Send + Sync + 'static,
{
    async fn create(&self, mut draft: T) -> Result<T, RemoteError> {
        self.round_trip().await?;
        draft.set_key(Uuid::now_v7().to_string());
        self.records.write().await.insert(draft.key(), draft.clone());
        Ok(draft)
    }

    async fn update(&self, record: T) -> Result<T, RemoteError> {
        self.round_trip().await?;
        let mut records = self.records.write().await;
        let Some(existing) = records.get_mut(&record.key()) else {
            return Err(RemoteError::NotFound(record.key()));
        };
        *existing = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.round_trip().await?;
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }
}
