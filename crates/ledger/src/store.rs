//! Transaction record store boundary and in-memory implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use inventaris_core::{DomainError, DomainResult, ProductId, SupplierId, TransactionId};

use crate::movement::{MovementKind, Transaction};
use crate::query::{Page, Pagination, TransactionFilter};

/// Fields for a transaction the store has not yet assigned an id to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransactionRecord {
    pub kind: MovementKind,
    pub quantity: u32,
    pub note: Option<String>,
    pub product_id: ProductId,
    pub supplier_id: Option<SupplierId>,
    pub created_at: DateTime<Utc>,
}

/// Replacement fields for an existing transaction. The product reference
/// is deliberately absent: amendments never move a transaction to another
/// product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionUpdate {
    pub kind: MovementKind,
    pub quantity: u32,
    pub note: Option<String>,
    pub supplier_id: Option<SupplierId>,
}

impl From<&Transaction> for TransactionUpdate {
    fn from(tx: &Transaction) -> Self {
        Self {
            kind: tx.kind,
            quantity: tx.quantity,
            note: tx.note.clone(),
            supplier_id: tx.supplier_id,
        }
    }
}

/// Transaction record store.
pub trait TransactionStore: Send + Sync {
    /// Persist a new transaction, assigning its id.
    fn create(&self, record: NewTransactionRecord) -> DomainResult<Transaction>;

    fn find_by_id(&self, id: TransactionId) -> Option<Transaction>;

    /// Replace the movement fields of an existing transaction.
    fn update(
        &self,
        id: TransactionId,
        fields: TransactionUpdate,
    ) -> DomainResult<Transaction>;

    fn delete(&self, id: TransactionId) -> DomainResult<()>;

    /// One page of matching transactions, newest first.
    fn list(&self, filter: &TransactionFilter, pagination: Pagination) -> Page<Transaction>;

    /// All matching transactions, newest first (stats, search).
    fn all_matching(&self, filter: &TransactionFilter) -> Vec<Transaction>;
}

impl<S> TransactionStore for Arc<S>
where
    S: TransactionStore + ?Sized,
{
    fn create(&self, record: NewTransactionRecord) -> DomainResult<Transaction> {
        (**self).create(record)
    }

    fn find_by_id(&self, id: TransactionId) -> Option<Transaction> {
        (**self).find_by_id(id)
    }

    fn update(
        &self,
        id: TransactionId,
        fields: TransactionUpdate,
    ) -> DomainResult<Transaction> {
        (**self).update(id, fields)
    }

    fn delete(&self, id: TransactionId) -> DomainResult<()> {
        (**self).delete(id)
    }

    fn list(&self, filter: &TransactionFilter, pagination: Pagination) -> Page<Transaction> {
        (**self).list(filter, pagination)
    }

    fn all_matching(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        (**self).all_matching(filter)
    }
}

/// In-memory transaction store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryTransactionStore {
    records: RwLock<HashMap<TransactionId, Transaction>>,
    next_id: AtomicU64,
}

impl Default for InMemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn ordered(mut txs: Vec<Transaction>) -> Vec<Transaction> {
        // Newest first; id breaks ties for identical timestamps.
        txs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        txs
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn create(&self, record: NewTransactionRecord) -> DomainResult<Transaction> {
        let id = TransactionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let tx = Transaction {
            id,
            kind: record.kind,
            quantity: record.quantity,
            note: record.note,
            product_id: record.product_id,
            supplier_id: record.supplier_id,
            created_at: record.created_at,
        };

        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("transaction store lock poisoned"))?;
        records.insert(id, tx.clone());
        Ok(tx)
    }

    fn find_by_id(&self, id: TransactionId) -> Option<Transaction> {
        self.records.read().ok()?.get(&id).cloned()
    }

    fn update(
        &self,
        id: TransactionId,
        fields: TransactionUpdate,
    ) -> DomainResult<Transaction> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("transaction store lock poisoned"))?;
        let tx = records.get_mut(&id).ok_or(DomainError::NotFound)?;
        tx.kind = fields.kind;
        tx.quantity = fields.quantity;
        tx.note = fields.note;
        tx.supplier_id = fields.supplier_id;
        Ok(tx.clone())
    }

    fn delete(&self, id: TransactionId) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("transaction store lock poisoned"))?;
        records.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    fn list(&self, filter: &TransactionFilter, pagination: Pagination) -> Page<Transaction> {
        Page::from_ordered(self.all_matching(filter), pagination)
    }

    fn all_matching(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        let records = match self.records.read() {
            Ok(r) => r,
            Err(_) => return vec![],
        };
        let matching = records
            .values()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        Self::ordered(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product: u64, kind: MovementKind, quantity: u32) -> NewTransactionRecord {
        NewTransactionRecord {
            kind,
            quantity,
            note: None,
            product_id: ProductId::new(product),
            supplier_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let store = InMemoryTransactionStore::new();
        let a = store.create(record(1, MovementKind::In, 5)).unwrap();
        let b = store.create(record(1, MovementKind::Out, 2)).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn update_replaces_movement_fields_only() {
        let store = InMemoryTransactionStore::new();
        let tx = store.create(record(1, MovementKind::In, 5)).unwrap();

        let updated = store
            .update(
                tx.id,
                TransactionUpdate {
                    kind: MovementKind::Out,
                    quantity: 3,
                    note: Some("correction".to_string()),
                    supplier_id: None,
                },
            )
            .unwrap();

        assert_eq!(updated.kind, MovementKind::Out);
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.product_id, tx.product_id);
        assert_eq!(updated.created_at, tx.created_at);
    }

    #[test]
    fn update_missing_is_not_found() {
        let store = InMemoryTransactionStore::new();
        let err = store
            .update(
                TransactionId::new(42),
                TransactionUpdate {
                    kind: MovementKind::In,
                    quantity: 1,
                    note: None,
                    supplier_id: None,
                },
            )
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn list_filters_by_product_and_kind() {
        let store = InMemoryTransactionStore::new();
        store.create(record(1, MovementKind::In, 5)).unwrap();
        store.create(record(1, MovementKind::Out, 2)).unwrap();
        store.create(record(2, MovementKind::In, 7)).unwrap();

        let by_product = store.all_matching(&TransactionFilter::for_product(ProductId::new(1)));
        assert_eq!(by_product.len(), 2);

        let by_kind = store.all_matching(&TransactionFilter::for_kind(MovementKind::In));
        assert_eq!(by_kind.len(), 2);
    }

    #[test]
    fn listing_is_newest_first_and_repeatable() {
        let store = InMemoryTransactionStore::new();
        for i in 0..5 {
            store.create(record(1, MovementKind::In, i + 1)).unwrap();
        }

        let first = store.all_matching(&TransactionFilter::default());
        let second = store.all_matching(&TransactionFilter::default());
        assert_eq!(first, second);

        for pair in first.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
            if pair[0].created_at == pair[1].created_at {
                assert!(pair[0].id > pair[1].id);
            }
        }
    }
}
