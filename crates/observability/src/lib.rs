//! Observability wiring for inventaris processes.

pub mod tracing;

pub use tracing::init;
