//! Background listener turning ledger events into emails.
//!
//! Runs on its own thread so the ledger's write path never waits on email
//! delivery. One attempt per event, no retry queue; a failed delivery is
//! logged by the worker loop and the next event is processed normally.

use inventaris_catalog::ProductStore;
use inventaris_events::{Event, EventBus, Worker, WorkerHandle};
use inventaris_ledger::MovementRecorded;
use tracing::debug;

use crate::dispatcher::{LowStockItem, NotificationDispatcher};
use crate::settings::NotifySettings;
use crate::transport::{Delivery, EmailTransport};

/// Spawns the notification listener.
#[derive(Debug)]
pub struct NotificationWorker;

impl NotificationWorker {
    /// Subscribe to the bus and process `MovementRecorded` events until the
    /// returned handle is shut down.
    ///
    /// Every event gets a movement email; an event whose stock dropped from
    /// at-or-above the threshold to below it additionally gets a low-stock
    /// email listing all products currently below the threshold.
    pub fn spawn<B, M, P>(
        bus: B,
        dispatcher: NotificationDispatcher<M>,
        products: P,
        settings: NotifySettings,
    ) -> WorkerHandle
    where
        B: EventBus<MovementRecorded> + Send + Sync + 'static,
        M: EmailTransport + 'static,
        P: ProductStore + 'static,
    {
        Worker::spawn("notifications", bus, move |event: MovementRecorded| {
            handle_event(&dispatcher, &products, &settings, event)
        })
    }
}

fn handle_event<M, P>(
    dispatcher: &NotificationDispatcher<M>,
    products: &P,
    settings: &NotifySettings,
    event: MovementRecorded,
) -> Result<(), String>
where
    M: EmailTransport,
    P: ProductStore,
{
    let Some(recipient) = settings.recipient.as_deref() else {
        debug!(
            event_id = %event.event_id,
            event_type = event.event_type(),
            "no notification recipient configured; skipping"
        );
        return Ok(());
    };

    let mut failures = Vec::new();

    let outcome = dispatcher.notify_movement(
        recipient,
        event.transaction.kind,
        &event.product_name,
        event.transaction.quantity,
        event.transaction.note.as_deref(),
    );
    if let Delivery::Failed { reason } = outcome {
        failures.push(format!("movement email: {reason}"));
    }

    if event.crossed_below(settings.low_stock_threshold) {
        let items: Vec<LowStockItem> = products
            .products_below(settings.low_stock_threshold)
            .iter()
            .map(LowStockItem::from)
            .collect();
        let outcome = dispatcher.notify_low_stock(recipient, &items);
        if let Delivery::Failed { reason } = outcome {
            failures.push(format!("low-stock email: {reason}"));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures.join("; "))
    }
}
