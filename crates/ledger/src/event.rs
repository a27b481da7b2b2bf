use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inventaris_core::ProductId;
use inventaris_events::Event;

use crate::movement::Transaction;

/// Published after a movement has been committed (record + stock persisted).
///
/// Carries the stock level before and after the movement so consumers can
/// detect a low-stock crossing without re-reading the stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecorded {
    pub event_id: Uuid,
    pub transaction: Transaction,
    pub product_id: ProductId,
    pub product_name: String,
    pub stock_before: i64,
    pub stock_after: i64,
    pub occurred_at: DateTime<Utc>,
}

impl MovementRecorded {
    /// Whether this movement dropped the stock from at-or-above `threshold`
    /// to below it.
    pub fn crossed_below(&self, threshold: i64) -> bool {
        self.stock_before >= threshold && self.stock_after < threshold
    }
}

impl Event for MovementRecorded {
    fn event_type(&self) -> &'static str {
        "ledger.movement_recorded"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementKind;
    use inventaris_core::TransactionId;

    fn event(stock_before: i64, stock_after: i64) -> MovementRecorded {
        let now = Utc::now();
        MovementRecorded {
            event_id: Uuid::now_v7(),
            transaction: Transaction {
                id: TransactionId::new(1),
                kind: MovementKind::Out,
                quantity: (stock_before - stock_after).unsigned_abs() as u32,
                note: None,
                product_id: ProductId::new(1),
                supplier_id: None,
                created_at: now,
            },
            product_id: ProductId::new(1),
            product_name: "Kardus".to_string(),
            stock_before,
            stock_after,
            occurred_at: now,
        }
    }

    #[test]
    fn event_metadata_is_stable() {
        let e = event(12, 7);
        assert_eq!(e.event_type(), "ledger.movement_recorded");
        assert_eq!(e.version(), 1);
        assert_eq!(e.occurred_at(), e.occurred_at);
    }

    #[test]
    fn crossing_requires_starting_at_or_above_threshold() {
        assert!(event(12, 7).crossed_below(10));
        assert!(event(10, 9).crossed_below(10));
        // Already below before the movement: no crossing.
        assert!(!event(9, 4).crossed_below(10));
        // Still at or above afterwards: no crossing.
        assert!(!event(15, 10).crossed_below(10));
    }
}
