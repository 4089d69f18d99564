// Realtime runner consumes the pushed change feed and merges it into an optimistic collection.
//
// Purpose
// - Apply every event in arrival order, independently of optimistic operations in flight.
//
// Responsibilities
// - Stop when the feed closes and report how many events were applied.

use crate::application::optimistic_collection::OptimisticCollection;
use crate::application::realtime::event::RealtimeEvent;
use crate::core::identity::Identifiable;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct RealtimeRunner<T: Identifiable> {
    pub name: String,
    collection: OptimisticCollection<T>,
}

impl<T> RealtimeRunner<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, collection: OptimisticCollection<T>) -> Self {
        Self {
            name: name.into(),
            collection,
        }
    }

    pub async fn run(self, mut events: mpsc::Receiver<RealtimeEvent<T>>) -> usize {
        let mut applied = 0;
        while let Some(event) = events.recv().await {
            tracing::debug!(runner = %self.name, kind = event.kind(), "applying realtime event");
            self.collection.apply_realtime(event);
            applied += 1;
        }
        tracing::info!(runner = %self.name, applied, "realtime feed closed");
        applied
    }

    pub fn spawn(self, events: mpsc::Receiver<RealtimeEvent<T>>) -> JoinHandle<usize> {
        tokio::spawn(self.run(events))
    }
}

#[cfg(test)]
mod realtime_runner_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_notifier::InMemoryNotifier;
    use crate::test_support::fixtures::entities::Row;
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    #[fixture]
    fn collection() -> OptimisticCollection<Row> {
        OptimisticCollection::new(
            vec![Row::new("1", 1), Row::new("2", 2)],
            Arc::new(InMemoryNotifier::new()),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_apply_events_in_order_until_the_feed_closes(
        collection: OptimisticCollection<Row>,
    ) {
        let (tx, rx) = mpsc::channel(8);
        let handle = RealtimeRunner::new("orders", collection.clone()).spawn(rx);

        tx.send(RealtimeEvent::Inserted(Row::new("3", 3))).await.unwrap();
        tx.send(RealtimeEvent::Updated(Row::new("1", 10))).await.unwrap();
        tx.send(RealtimeEvent::Deleted("2".to_string())).await.unwrap();
        tx.send(RealtimeEvent::Updated(Row::new("missing", 0))).await.unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap(), 4);
        assert_eq!(collection.items(), vec![Row::new("3", 3), Row::new("1", 10)]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_replace_everything_on_resync(collection: OptimisticCollection<Row>) {
        let (tx, rx) = mpsc::channel(1);
        let runner = RealtimeRunner::new("orders", collection.clone());
        tx.send(RealtimeEvent::Resynced(vec![Row::new("7", 7)])).await.unwrap();
        drop(tx);

        assert_eq!(runner.run(rx).await, 1);
        assert_eq!(collection.items(), vec![Row::new("7", 7)]);
    }

    #[rstest]
    fn it_should_name_event_kinds() {
        let event: RealtimeEvent<Row> = RealtimeEvent::Deleted("1".into());
        assert_eq!(event.kind(), "deleted");
        assert_eq!(RealtimeEvent::Resynced(Vec::<Row>::new()).kind(), "resynced");
    }
}
