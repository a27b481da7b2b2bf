//! Record store boundaries and in-memory implementations.
//!
//! The traits are the narrow contracts the ledger and the notification
//! path depend on (`find_by_id`, `save`, plus listing). In-memory
//! implementations back tests and dev wiring; a SQL backend would
//! implement the same traits.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

use inventaris_core::{CategoryId, DomainError, DomainResult, ProductId, SupplierId};

use crate::{Category, Product, Supplier};

/// Product record store.
pub trait ProductStore: Send + Sync {
    fn find_by_id(&self, id: ProductId) -> Option<Product>;

    /// Insert or replace the record (the ledger persists adjusted stock
    /// through this).
    fn save(&self, product: Product) -> DomainResult<()>;

    fn delete(&self, id: ProductId) -> DomainResult<()>;

    fn list(&self) -> Vec<Product>;

    /// Case-insensitive substring match over the product name.
    fn search_by_name(&self, term: &str) -> Vec<Product>;

    /// Products whose stock is strictly below `threshold` (low-stock email).
    fn products_below(&self, threshold: i64) -> Vec<Product>;
}

/// Category record store.
pub trait CategoryStore: Send + Sync {
    fn find_by_id(&self, id: CategoryId) -> Option<Category>;
    fn save(&self, category: Category) -> DomainResult<()>;
    fn delete(&self, id: CategoryId) -> DomainResult<()>;
    fn list(&self) -> Vec<Category>;
}

/// Supplier record store.
pub trait SupplierStore: Send + Sync {
    fn find_by_id(&self, id: SupplierId) -> Option<Supplier>;
    fn save(&self, supplier: Supplier) -> DomainResult<()>;
    fn delete(&self, id: SupplierId) -> DomainResult<()>;
    fn list(&self) -> Vec<Supplier>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn find_by_id(&self, id: ProductId) -> Option<Product> {
        (**self).find_by_id(id)
    }

    fn save(&self, product: Product) -> DomainResult<()> {
        (**self).save(product)
    }

    fn delete(&self, id: ProductId) -> DomainResult<()> {
        (**self).delete(id)
    }

    fn list(&self) -> Vec<Product> {
        (**self).list()
    }

    fn search_by_name(&self, term: &str) -> Vec<Product> {
        (**self).search_by_name(term)
    }

    fn products_below(&self, threshold: i64) -> Vec<Product> {
        (**self).products_below(threshold)
    }
}

impl<S> CategoryStore for Arc<S>
where
    S: CategoryStore + ?Sized,
{
    fn find_by_id(&self, id: CategoryId) -> Option<Category> {
        (**self).find_by_id(id)
    }

    fn save(&self, category: Category) -> DomainResult<()> {
        (**self).save(category)
    }

    fn delete(&self, id: CategoryId) -> DomainResult<()> {
        (**self).delete(id)
    }

    fn list(&self) -> Vec<Category> {
        (**self).list()
    }
}

impl<S> SupplierStore for Arc<S>
where
    S: SupplierStore + ?Sized,
{
    fn find_by_id(&self, id: SupplierId) -> Option<Supplier> {
        (**self).find_by_id(id)
    }

    fn save(&self, supplier: Supplier) -> DomainResult<()> {
        (**self).save(supplier)
    }

    fn delete(&self, id: SupplierId) -> DomainResult<()> {
        (**self).delete(id)
    }

    fn list(&self) -> Vec<Supplier> {
        (**self).list()
    }
}

/// In-memory product store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryProductStore {
    records: RwLock<HashMap<ProductId, Product>>,
    next_id: AtomicU64,
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Hand out the next integer id (stand-in for an auto-increment column).
    pub fn allocate_id(&self) -> ProductId {
        ProductId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl ProductStore for InMemoryProductStore {
    fn find_by_id(&self, id: ProductId) -> Option<Product> {
        self.records.read().ok()?.get(&id).cloned()
    }

    fn save(&self, product: Product) -> DomainResult<()> {
        product.validate()?;
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("product store lock poisoned"))?;
        records.insert(product.id, product);
        Ok(())
    }

    fn delete(&self, id: ProductId) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("product store lock poisoned"))?;
        records.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    fn list(&self) -> Vec<Product> {
        let records = match self.records.read() {
            Ok(r) => r,
            Err(_) => return vec![],
        };
        let mut all: Vec<Product> = records.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        all
    }

    fn search_by_name(&self, term: &str) -> Vec<Product> {
        let needle = term.to_lowercase();
        self.list()
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn products_below(&self, threshold: i64) -> Vec<Product> {
        self.list()
            .into_iter()
            .filter(|p| p.stock < threshold)
            .collect()
    }
}

/// In-memory category store.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    records: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CategoryStore for InMemoryCategoryStore {
    fn find_by_id(&self, id: CategoryId) -> Option<Category> {
        self.records.read().ok()?.get(&id).cloned()
    }

    fn save(&self, category: Category) -> DomainResult<()> {
        category.validate()?;
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("category store lock poisoned"))?;
        records.insert(category.id, category);
        Ok(())
    }

    fn delete(&self, id: CategoryId) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("category store lock poisoned"))?;
        records.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    fn list(&self) -> Vec<Category> {
        let records = match self.records.read() {
            Ok(r) => r,
            Err(_) => return vec![],
        };
        let mut all: Vec<Category> = records.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        all
    }
}

/// In-memory supplier store.
#[derive(Debug, Default)]
pub struct InMemorySupplierStore {
    records: RwLock<HashMap<SupplierId, Supplier>>,
}

impl InMemorySupplierStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SupplierStore for InMemorySupplierStore {
    fn find_by_id(&self, id: SupplierId) -> Option<Supplier> {
        self.records.read().ok()?.get(&id).cloned()
    }

    fn save(&self, supplier: Supplier) -> DomainResult<()> {
        supplier.validate()?;
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("supplier store lock poisoned"))?;
        records.insert(supplier.id, supplier);
        Ok(())
    }

    fn delete(&self, id: SupplierId) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::conflict("supplier store lock poisoned"))?;
        records.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    fn list(&self) -> Vec<Supplier> {
        let records = match self.records.read() {
            Ok(r) => r,
            Err(_) => return vec![],
        };
        let mut all: Vec<Supplier> = records.values().cloned().collect();
        all.sort_by_key(|s| s.id);
        all
    }
}
