use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inventaris_core::{CategoryId, DomainError, DomainResult, ProductId, SupplierId};

/// Maximum length for free-text name fields.
const MAX_NAME_LEN: usize = 255;

/// A product record.
///
/// `stock` is a ledger balance: it equals the product's initial stock plus
/// the signed sum of all currently existing movements. Only the ledger
/// mutates it after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: Option<String>,
    pub stock: i64,
    pub unit_price: f64,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, stock: i64, unit_price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            brand: None,
            stock,
            unit_price,
            category_id: None,
            supplier_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Validate record-level invariants (applied on create/update, not on
    /// ledger stock adjustments, which carry their own checks).
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "product name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        if let Some(brand) = &self.brand {
            if brand.len() > MAX_NAME_LEN {
                return Err(DomainError::validation(format!(
                    "brand cannot exceed {MAX_NAME_LEN} characters"
                )));
            }
        }
        if self.stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        if self.unit_price <= 0.0 {
            return Err(DomainError::validation("unit price must be greater than 0"));
        }
        Ok(())
    }
}
