//! Query types for transaction listings.
//!
//! All listings are paginated and ordered newest-first (`created_at`
//! descending, id descending as a tiebreak) so repeated reads without
//! intervening writes return identical pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inventaris_core::{DomainError, ProductId};

use crate::movement::{MovementKind, Transaction};

/// Hard cap on page size.
const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters (1-based page index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page < 1 {
            return Err(DomainError::validation("page must be >= 1"));
        }
        if self.per_page < 1 {
            return Err(DomainError::validation("per_page must be > 0"));
        }
        Ok(())
    }

    /// Effective page size after the safety cap.
    pub fn capped_per_page(&self) -> u32 {
        self.per_page.min(MAX_PER_PAGE)
    }

    fn offset(&self) -> usize {
        // Page 0 never passes validate(), but slicing must not underflow.
        (self.page as usize).saturating_sub(1) * self.capped_per_page() as usize
    }
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    /// Slice an already-ordered full result set down to one page.
    pub fn from_ordered(all: Vec<T>, pagination: Pagination) -> Self {
        let total = all.len() as u64;
        let per_page = pagination.capped_per_page();
        let items = all
            .into_iter()
            .skip(pagination.offset())
            .take(per_page as usize)
            .collect();
        Self {
            items,
            page: pagination.page,
            per_page,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Filter criteria for transaction listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub product_id: Option<ProductId>,
    pub kind: Option<MovementKind>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }

    pub fn for_kind(kind: MovementKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn between(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self {
            from,
            to,
            ..Self::default()
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(pid) = self.product_id {
            if tx.product_id != pid {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }
        if let Some(from) = self.from {
            if tx.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if tx.created_at > to {
                return false;
            }
        }
        true
    }
}

/// Aggregate figures over a set of movements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total: u64,
    pub in_count: u64,
    pub out_count: u64,
    pub total_in: u64,
    pub total_out: u64,
    pub net_change: i64,
}

impl TransactionStats {
    pub fn from_transactions<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut stats = Self::default();
        for tx in txs {
            stats.total += 1;
            match tx.kind {
                MovementKind::In => {
                    stats.in_count += 1;
                    stats.total_in += u64::from(tx.quantity);
                }
                MovementKind::Out => {
                    stats.out_count += 1;
                    stats.total_out += u64::from(tx.quantity);
                }
            }
        }
        stats.net_change = stats.total_in as i64 - stats.total_out as i64;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_is_invalid() {
        assert!(Pagination::new(0, 10).validate().is_err());
        assert!(Pagination::new(1, 0).validate().is_err());
        assert!(Pagination::new(1, 10).validate().is_ok());
    }

    #[test]
    fn per_page_is_capped() {
        assert_eq!(Pagination::new(1, 5000).capped_per_page(), 100);
    }

    #[test]
    fn page_beyond_end_is_empty_with_stable_total() {
        let page = Page::from_ordered(vec![1, 2, 3], Pagination::new(5, 2));
        assert!(page.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn zero_page_slices_like_the_first_page() {
        let page = Page::from_ordered(vec![1, 2, 3], Pagination::new(0, 2));
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn pages_slice_in_order() {
        let first = Page::from_ordered(vec![1, 2, 3, 4, 5], Pagination::new(1, 2));
        let second = Page::from_ordered(vec![1, 2, 3, 4, 5], Pagination::new(2, 2));
        assert_eq!(first.items, vec![1, 2]);
        assert_eq!(second.items, vec![3, 4]);
    }
}
