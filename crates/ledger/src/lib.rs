//! `inventaris-ledger` — the stock ledger.
//!
//! A product's stock is a running balance: its initial stock plus the
//! signed sum of all currently existing movements (`in` adds, `out`
//! subtracts). This crate owns that arithmetic: it validates movements
//! against current stock, keeps the transaction record and the product
//! balance in step, and publishes a `MovementRecorded` event for
//! best-effort consumers (notifications).

pub mod event;
pub mod ledger;
pub mod movement;
pub mod query;
pub mod store;

pub use event::MovementRecorded;
pub use ledger::StockLedger;
pub use movement::{AmendMovement, MovementKind, NewMovement, Transaction};
pub use query::{Page, Pagination, TransactionFilter, TransactionStats};
pub use store::{InMemoryTransactionStore, NewTransactionRecord, TransactionStore, TransactionUpdate};
