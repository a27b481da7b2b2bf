//! Infrastructure layer: wiring of stores, bus, ledger, and notifications.

pub mod context;


pub use context::{AppContext, InMemoryLedger};
