//! The stock ledger service.
//!
//! Orchestrates each movement's read-validate-write sequence against the
//! product and transaction stores:
//!
//! ```text
//! RecordMovement
//!   1. Validate input (quantity > 0)
//!   2. Take the product's write lock
//!   3. Load product, check out-sufficiency
//!   4. Persist transaction record + adjusted stock (all-or-nothing)
//!   5. Publish MovementRecorded (best-effort; failure logged, swallowed)
//! ```
//!
//! Amend and remove reverse the old movement's stock delta before applying
//! or deleting, so a product's stock always equals its initial stock plus
//! the signed sum of its currently existing movements.
//!
//! Writes to the same product are serialized through a per-product lock;
//! the stores see at most one in-flight read-validate-write per product.
//! Lock entries are created on demand and dropped once the last writer
//! releases them, so the registry never outgrows the set of products with
//! writes in flight.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use inventaris_catalog::ProductStore;
use inventaris_core::{DomainError, DomainResult, ProductId, TransactionId};
use inventaris_events::{Event, EventBus};

use crate::event::MovementRecorded;
use crate::movement::{AmendMovement, MovementKind, NewMovement, Transaction};
use crate::query::{Page, Pagination, TransactionFilter, TransactionStats};
use crate::store::{NewTransactionRecord, TransactionStore, TransactionUpdate};

/// The stock ledger: keeps `Product.stock` consistent with the sum of
/// recorded movements and emits events for best-effort consumers.
#[derive(Debug)]
pub struct StockLedger<P, T, B> {
    products: P,
    transactions: T,
    bus: B,
    locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl<P, T, B> StockLedger<P, T, B> {
    pub fn new(products: P, transactions: T, bus: B) -> Self {
        Self {
            products,
            transactions,
            bus,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn product_lock(&self, id: ProductId) -> DomainResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| DomainError::conflict("lock registry poisoned"))?;
        Ok(locks.entry(id).or_default().clone())
    }

    /// Run `f` while holding the product's write lock.
    ///
    /// The registry entry is removed afterwards when no other writer holds
    /// it, so rejected ids and deleted products leave nothing behind.
    fn with_product_lock<R>(
        &self,
        id: ProductId,
        f: impl FnOnce() -> DomainResult<R>,
    ) -> DomainResult<R> {
        let lock = self.product_lock(id)?;
        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(DomainError::conflict("product lock poisoned")),
        };
        if let Ok(mut locks) = self.locks.lock() {
            // Registry entry plus this call's clone: nobody is waiting.
            if Arc::strong_count(&lock) == 2 {
                locks.remove(&id);
            }
        }
        result
    }
}

impl<P, T, B> StockLedger<P, T, B>
where
    P: ProductStore,
    T: TransactionStore,
    B: EventBus<MovementRecorded>,
{
    /// Record a new movement and apply its stock delta.
    ///
    /// Validation failures leave both stores untouched. On success the
    /// product's stock has been adjusted exactly once and a
    /// `MovementRecorded` event has been offered to the bus; a publish
    /// failure is logged and never surfaced.
    pub fn record_movement(&self, movement: NewMovement) -> DomainResult<Transaction> {
        if movement.quantity == 0 {
            return Err(DomainError::validation("quantity must be a positive integer"));
        }

        let product_id = movement.product_id;
        self.with_product_lock(product_id, move || {
            let mut product = self
                .products
                .find_by_id(product_id)
                .ok_or(DomainError::NotFound)?;
            let stock_before = product.stock;

            if movement.kind == MovementKind::Out && stock_before < i64::from(movement.quantity) {
                return Err(DomainError::insufficient_stock(movement.quantity, stock_before));
            }

            let now = Utc::now();
            let tx = self.transactions.create(NewTransactionRecord {
                kind: movement.kind,
                quantity: movement.quantity,
                note: movement.note,
                product_id,
                supplier_id: movement.supplier_id,
                created_at: now,
            })?;

            product.stock = stock_before + tx.effect();
            if let Err(err) = self.products.save(product.clone()) {
                // Keep record and balance in step: drop the record we just created.
                let _ = self.transactions.delete(tx.id);
                return Err(err);
            }

            debug!(
                product_id = %product.id,
                transaction_id = %tx.id,
                kind = %tx.kind,
                quantity = tx.quantity,
                stock_before,
                stock_after = product.stock,
                "movement recorded"
            );

            let event = MovementRecorded {
                event_id: Uuid::now_v7(),
                transaction: tx.clone(),
                product_id: product.id,
                product_name: product.name.clone(),
                stock_before,
                stock_after: product.stock,
                occurred_at: now,
            };
            let event_type = event.event_type();
            if let Err(err) = self.bus.publish(event) {
                warn!(transaction_id = %tx.id, event_type, error = ?err, "movement event publish failed");
            }

            Ok(tx)
        })
    }

    /// Replace an existing movement, atomically reversing its old stock
    /// delta and applying the new one.
    ///
    /// The new movement is validated against the stock as it would be with
    /// the old movement reversed. The product reference never changes.
    pub fn amend_movement(
        &self,
        id: TransactionId,
        amendment: AmendMovement,
    ) -> DomainResult<Transaction> {
        if amendment.quantity == 0 {
            return Err(DomainError::validation("quantity must be a positive integer"));
        }

        let existing = self.transactions.find_by_id(id).ok_or(DomainError::NotFound)?;

        self.with_product_lock(existing.product_id, move || {
            // Re-read under the lock; the record may have changed meanwhile.
            let existing = self.transactions.find_by_id(id).ok_or(DomainError::NotFound)?;
            let mut product = self
                .products
                .find_by_id(existing.product_id)
                .ok_or(DomainError::NotFound)?;

            let base = product.stock - existing.effect();
            let stock_after = base + amendment.kind.effect(amendment.quantity);
            if stock_after < 0 {
                return Err(DomainError::insufficient_stock(amendment.quantity, base));
            }

            let previous = TransactionUpdate::from(&existing);
            let updated = self.transactions.update(
                id,
                TransactionUpdate {
                    kind: amendment.kind,
                    quantity: amendment.quantity,
                    note: amendment.note,
                    supplier_id: amendment.supplier_id,
                },
            )?;

            let stock_before = product.stock;
            product.stock = stock_after;
            if let Err(err) = self.products.save(product.clone()) {
                let _ = self.transactions.update(id, previous);
                return Err(err);
            }

            debug!(
                product_id = %product.id,
                transaction_id = %id,
                stock_before,
                stock_after,
                "movement amended"
            );

            Ok(updated)
        })
    }

    /// Delete a movement, reversing its stock delta on the product.
    pub fn remove_movement(&self, id: TransactionId) -> DomainResult<()> {
        let existing = self.transactions.find_by_id(id).ok_or(DomainError::NotFound)?;

        self.with_product_lock(existing.product_id, || {
            let existing = self.transactions.find_by_id(id).ok_or(DomainError::NotFound)?;
            let mut product = self
                .products
                .find_by_id(existing.product_id)
                .ok_or(DomainError::NotFound)?;

            let stock_before = product.stock;
            let stock_after = stock_before - existing.effect();
            if stock_after < 0 {
                // Reversing an `in` whose units were since consumed.
                return Err(DomainError::insufficient_stock(existing.quantity, stock_before));
            }

            product.stock = stock_after;
            self.products.save(product.clone())?;
            if let Err(err) = self.transactions.delete(id) {
                // Record refused to go; restore the balance.
                product.stock = stock_before;
                let _ = self.products.save(product);
                return Err(err);
            }

            debug!(
                product_id = %product.id,
                transaction_id = %id,
                stock_before,
                stock_after,
                "movement removed"
            );

            Ok(())
        })
    }

    pub fn get(&self, id: TransactionId) -> DomainResult<Transaction> {
        self.transactions.find_by_id(id).ok_or(DomainError::NotFound)
    }

    /// One page of matching movements, newest first.
    pub fn list(
        &self,
        filter: TransactionFilter,
        pagination: Pagination,
    ) -> DomainResult<Page<Transaction>> {
        pagination.validate()?;
        Ok(self.transactions.list(&filter, pagination))
    }

    /// Substring search over the movement note and the product name.
    pub fn search(
        &self,
        term: &str,
        pagination: Pagination,
    ) -> DomainResult<Page<Transaction>> {
        pagination.validate()?;

        let needle = term.to_lowercase();
        let name_matches: HashSet<ProductId> = self
            .products
            .search_by_name(term)
            .into_iter()
            .map(|p| p.id)
            .collect();

        let hits: Vec<Transaction> = self
            .transactions
            .all_matching(&TransactionFilter::default())
            .into_iter()
            .filter(|tx| {
                name_matches.contains(&tx.product_id)
                    || tx
                        .note
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect();

        Ok(Page::from_ordered(hits, pagination))
    }

    /// Aggregate figures over movements in the (inclusive) date range.
    pub fn stats(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> TransactionStats {
        let matching = self
            .transactions
            .all_matching(&TransactionFilter::between(from, to));
        TransactionStats::from_transactions(matching.iter())
    }
}
