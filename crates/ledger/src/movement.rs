use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use inventaris_core::{DomainError, ProductId, SupplierId, TransactionId};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Incoming stock (`+quantity`).
    In,
    /// Outgoing stock (`-quantity`).
    Out,
}

impl MovementKind {
    /// Signed stock delta this movement applies to its product.
    pub fn effect(&self, quantity: u32) -> i64 {
        match self {
            MovementKind::In => i64::from(quantity),
            MovementKind::Out => -i64::from(quantity),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::In => "in",
            MovementKind::Out => "out",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(MovementKind::In),
            "out" => Ok(MovementKind::Out),
            other => Err(DomainError::validation(format!(
                "movement type must be \"in\" or \"out\", got \"{other}\""
            ))),
        }
    }
}

/// A recorded stock movement.
///
/// Immutable in kind after creation except via amendment, which is a full
/// replace of the movement fields (the product reference never changes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: MovementKind,
    pub quantity: u32,
    pub note: Option<String>,
    pub product_id: ProductId,
    pub supplier_id: Option<SupplierId>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Signed stock delta this transaction contributed to its product.
    pub fn effect(&self) -> i64 {
        self.kind.effect(self.quantity)
    }
}

/// Input for recording a new movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: u32,
    pub note: Option<String>,
    pub supplier_id: Option<SupplierId>,
}

impl NewMovement {
    pub fn new(product_id: ProductId, kind: MovementKind, quantity: u32) -> Self {
        Self {
            product_id,
            kind,
            quantity,
            note: None,
            supplier_id: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }
}

/// Input for amending an existing movement (full replace of the movement
/// fields; the product reference is fixed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendMovement {
    pub kind: MovementKind,
    pub quantity: u32,
    pub note: Option<String>,
    pub supplier_id: Option<SupplierId>,
}
