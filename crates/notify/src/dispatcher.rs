//! Notification formatting and dispatch.
//!
//! Two notification kinds, both HTML emails modeled on the source system's
//! templates: a per-movement notice and a low-stock warning listing every
//! product currently below the threshold. No deduplication: calling twice
//! sends two emails.

use inventaris_catalog::Product;
use inventaris_ledger::MovementKind;
use tracing::{debug, warn};

use crate::transport::{Delivery, EmailTransport};

/// A product entry in the low-stock email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockItem {
    pub name: String,
    pub stock: i64,
}

impl From<&Product> for LowStockItem {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            stock: p.stock,
        }
    }
}

/// Formats and sends the two notification kinds over an email transport.
#[derive(Debug)]
pub struct NotificationDispatcher<M> {
    mailer: M,
}

impl<M> NotificationDispatcher<M>
where
    M: EmailTransport,
{
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    /// Send a movement notice. Returns the delivery outcome; callers on the
    /// ledger's event path must not propagate a failure.
    pub fn notify_movement(
        &self,
        recipient: &str,
        kind: MovementKind,
        product_name: &str,
        quantity: u32,
        note: Option<&str>,
    ) -> Delivery {
        let label = match kind {
            MovementKind::In => "Incoming",
            MovementKind::Out => "Outgoing",
        };
        let color = match kind {
            MovementKind::In => "#10b981",
            MovementKind::Out => "#ef4444",
        };

        let note_row = note
            .map(|n| format!("<p><strong>Note:</strong> {n}</p>"))
            .unwrap_or_default();

        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
               <h2 style=\"color: {color};\">{label} Stock Movement</h2>\
               <div style=\"background-color: #f9fafb; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
                 <p><strong>Product:</strong> {product_name}</p>\
                 <p><strong>Quantity:</strong> {quantity}</p>\
                 <p><strong>Type:</strong> {label}</p>\
                 {note_row}\
               </div>\
               <p style=\"color: #666;\">This movement has been recorded in the inventory system.</p>\
             </div>"
        );

        let subject = format!("{label} Stock Movement - {product_name}");
        self.deliver(recipient, &subject, &html)
    }

    /// Send a single email listing all given low-stock products.
    pub fn notify_low_stock(&self, recipient: &str, items: &[LowStockItem]) -> Delivery {
        let rows: String = items
            .iter()
            .map(|i| format!("<li>{} - stock: {}</li>", i.name, i.stock))
            .collect();

        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
               <h2 style=\"color: #dc2626;\">Warning: Low Stock</h2>\
               <p>The following products are running low:</p>\
               <ul>{rows}</ul>\
               <p style=\"color: #666; margin-top: 20px;\">Please restock the products listed above.</p>\
             </div>"
        );

        self.deliver(recipient, "Warning: Low Stock", &html)
    }

    fn deliver(&self, to: &str, subject: &str, html: &str) -> Delivery {
        let outcome = self.mailer.send(to, subject, html);
        match &outcome {
            Delivery::Failed { reason } => {
                warn!(to, subject, reason, "email delivery failed");
            }
            _ => {
                debug!(to, subject, "email dispatched");
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::transport::NoopMailer;

    /// Transport that captures every send for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String, String)>>,
    }

    impl EmailTransport for RecordingMailer {
        fn send(&self, to: &str, subject: &str, html_body: &str) -> Delivery {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), html_body.to_string()));
            Delivery::Sent {
                message_id: format!("msg-{}", self.sent.lock().unwrap().len()),
            }
        }
    }

    /// Transport that always reports failure.
    #[derive(Debug, Default)]
    pub(crate) struct FailingMailer;

    impl EmailTransport for FailingMailer {
        fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Delivery {
            Delivery::Failed {
                reason: "transport unavailable".to_string(),
            }
        }
    }

    #[test]
    fn movement_email_contains_product_and_quantity() {
        let mailer = RecordingMailer::default();
        let dispatcher = NotificationDispatcher::new(&mailer);

        let outcome = dispatcher.notify_movement(
            "admin@example.com",
            MovementKind::Out,
            "Kardus 40x40",
            5,
            Some("warehouse return"),
        );

        assert!(matches!(outcome, Delivery::Sent { .. }));
        let sent = mailer.sent.lock().unwrap();
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "admin@example.com");
        assert!(subject.contains("Outgoing"));
        assert!(subject.contains("Kardus 40x40"));
        assert!(body.contains("Kardus 40x40"));
        assert!(body.contains("<strong>Quantity:</strong> 5"));
        assert!(body.contains("warehouse return"));
    }

    #[test]
    fn movement_email_omits_missing_note() {
        let mailer = RecordingMailer::default();
        let dispatcher = NotificationDispatcher::new(&mailer);

        dispatcher.notify_movement("admin@example.com", MovementKind::In, "Pulpen", 3, None);

        let sent = mailer.sent.lock().unwrap();
        assert!(!sent[0].2.contains("Note:"));
    }

    #[test]
    fn low_stock_email_lists_every_item() {
        let mailer = RecordingMailer::default();
        let dispatcher = NotificationDispatcher::new(&mailer);

        let items = vec![
            LowStockItem {
                name: "Kardus".to_string(),
                stock: 7,
            },
            LowStockItem {
                name: "Spidol".to_string(),
                stock: 2,
            },
        ];
        dispatcher.notify_low_stock("admin@example.com", &items);

        let sent = mailer.sent.lock().unwrap();
        let body = &sent[0].2;
        assert!(body.contains("Kardus - stock: 7"));
        assert!(body.contains("Spidol - stock: 2"));
    }

    #[test]
    fn failure_is_reported_as_value_not_panic() {
        let dispatcher = NotificationDispatcher::new(FailingMailer);
        let outcome =
            dispatcher.notify_movement("admin@example.com", MovementKind::In, "Kardus", 1, None);
        assert!(outcome.is_failure());
    }

    #[test]
    fn two_calls_send_two_emails() {
        let mailer = RecordingMailer::default();
        let dispatcher = NotificationDispatcher::new(&mailer);

        dispatcher.notify_movement("a@example.com", MovementKind::In, "Kardus", 1, None);
        dispatcher.notify_movement("a@example.com", MovementKind::In, "Kardus", 1, None);

        assert_eq!(mailer.sent.lock().unwrap().len(), 2);
    }

    #[test]
    fn unconfigured_transport_degrades_to_logged() {
        let dispatcher = NotificationDispatcher::new(NoopMailer::new());
        let outcome =
            dispatcher.notify_movement("admin@example.com", MovementKind::In, "Kardus", 1, None);
        assert_eq!(outcome, Delivery::Logged);
    }
}
