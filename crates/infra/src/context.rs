//! Application composition root.
//!
//! Wires the in-memory stores, the event bus, the stock ledger, and the
//! notification worker into one context. A persistent deployment would
//! swap the store implementations behind the same traits.

use std::sync::Arc;

use inventaris_catalog::{InMemoryCategoryStore, InMemoryProductStore, InMemorySupplierStore};
use inventaris_events::{InMemoryEventBus, WorkerHandle};
use inventaris_ledger::{InMemoryTransactionStore, MovementRecorded, StockLedger};
use inventaris_notify::{
    EmailTransport, NotificationDispatcher, NotificationWorker, NotifySettings,
};

/// The fully in-memory ledger composition.
pub type InMemoryLedger = StockLedger<
    Arc<InMemoryProductStore>,
    Arc<InMemoryTransactionStore>,
    Arc<InMemoryEventBus<MovementRecorded>>,
>;

/// Shared application state: stores, bus, and the ledger built on them.
#[derive(Debug)]
pub struct AppContext {
    pub products: Arc<InMemoryProductStore>,
    pub categories: Arc<InMemoryCategoryStore>,
    pub suppliers: Arc<InMemorySupplierStore>,
    pub transactions: Arc<InMemoryTransactionStore>,
    pub bus: Arc<InMemoryEventBus<MovementRecorded>>,
    pub ledger: Arc<InMemoryLedger>,
}

impl AppContext {
    /// Build a context backed entirely by in-memory stores.
    pub fn in_memory() -> Self {
        let products = Arc::new(InMemoryProductStore::new());
        let categories = Arc::new(InMemoryCategoryStore::new());
        let suppliers = Arc::new(InMemorySupplierStore::new());
        let transactions = Arc::new(InMemoryTransactionStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(StockLedger::new(
            products.clone(),
            transactions.clone(),
            bus.clone(),
        ));

        Self {
            products,
            categories,
            suppliers,
            transactions,
            bus,
            ledger,
        }
    }

    /// Start the notification worker against this context's bus.
    ///
    /// The worker subscribes before this returns, so movements recorded
    /// afterwards are guaranteed to be offered to it. Call
    /// `WorkerHandle::shutdown` to stop it.
    pub fn start_notifications<M>(&self, mailer: M, settings: NotifySettings) -> WorkerHandle
    where
        M: EmailTransport + 'static,
    {
        NotificationWorker::spawn(
            self.bus.clone(),
            NotificationDispatcher::new(mailer),
            self.products.clone(),
            settings,
        )
    }
}
