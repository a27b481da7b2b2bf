//! `inventaris-events` — event distribution mechanics.
//!
//! Publish/subscribe plumbing used to decouple ledger writes from
//! best-effort side effects (notifications). No storage assumptions.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod worker;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use worker::{Worker, WorkerHandle};
