// Demo of the purchase order screen against an in memory backend.
//
// - One optimistic add that succeeds, one update that fails and rolls back.
// - A realtime feed pushing another user's order while the update is in flight. With the
//   default snapshot rollback the pushed order is lost again; OPTIMISTIC_ROLLBACK=entry keeps it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt};

use optimistic_state::adapters::in_memory::in_memory_remote::InMemoryRemote;
use optimistic_state::adapters::tracing_notifier::TracingNotifier;
use optimistic_state::application::optimistic_collection::OptimisticCollection;
use optimistic_state::application::options::OperationOptions;
use optimistic_state::application::realtime::event::RealtimeEvent;
use optimistic_state::application::realtime::runner::RealtimeRunner;
use optimistic_state::config::CollectionConfig;
use optimistic_state::core::ports::RemoteRepository;
use optimistic_state::core::purchase_order::{PurchaseOrder, PurchaseOrderStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = CollectionConfig::from_env()?;

    // In-memory deps for now
    let remote = Arc::new(InMemoryRemote::<PurchaseOrder>::new());
    remote.set_delay_ms(50);
    let orders = OptimisticCollection::with_config(Vec::new(), Arc::new(TracingNotifier), config);
    tracing::info!(config = ?orders.config(), "starting purchase order screen");

    let (feed, events) = mpsc::channel(16);
    let runner = RealtimeRunner::new("purchase_orders", orders.clone()).spawn(events);

    let draft = PurchaseOrder::draft("PO-24-0117", "MS20470AD4-6", 500);
    let created = orders
        .add_optimistic(
            draft.clone(),
            {
                let remote = remote.clone();
                move || async move { remote.create(draft).await }
            },
            OperationOptions::new()
                .success_message("Purchase order created")
                .loading_message("Creating purchase order"),
        )
        .await?;
    tracing::info!(id = %created.id, "created");

    remote.toggle_offline();
    let mut submitted = created.clone();
    submitted.status = PurchaseOrderStatus::Submitted;
    submitted.touch();
    let update = orders.update_optimistic(
        created.id.clone(),
        |order| order.status = PurchaseOrderStatus::Submitted,
        {
            let remote = remote.clone();
            move || async move { remote.update(submitted).await }
        },
        OperationOptions::new().error_message("Could not submit purchase order"),
    );
    let push = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let mut other = PurchaseOrder::draft("PO-24-0118", "AN960C10L", 1000);
        other.id = uuid::Uuid::now_v7().to_string();
        feed.send(RealtimeEvent::Inserted(other)).await
    };
    let (update, push) = tokio::join!(update, push);
    push?;
    if let Err(error) = update {
        tracing::warn!(%error, "submit rolled back");
    }
    remote.toggle_offline();

    drop(feed);
    let applied = runner.await?;
    tracing::info!(
        applied,
        orders = %serde_json::to_string_pretty(&orders.items())?,
        "final state"
    );
    Ok(())
}
