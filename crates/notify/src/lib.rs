//! `inventaris-notify` — best-effort email notifications.
//!
//! Reacts to ledger events (new movement, low-stock crossing) by attempting
//! to send an email. Delivery is fire-and-forget relative to the ledger:
//! one attempt per event, failures logged and swallowed, never propagated
//! to the operation that triggered them.

pub mod dispatcher;
pub mod settings;
pub mod transport;
pub mod worker;

pub use dispatcher::{LowStockItem, NotificationDispatcher};
pub use settings::NotifySettings;
pub use transport::{Delivery, EmailTransport, NoopMailer};
pub use worker::NotificationWorker;
