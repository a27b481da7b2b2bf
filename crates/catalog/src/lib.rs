//! `inventaris-catalog` — product, category, and supplier records.
//!
//! The ledger treats these as collaborating record stores: it reads a
//! product's current stock and persists the adjusted value. Everything
//! here is plain CRUD with validation; the stock arithmetic itself lives
//! in `inventaris-ledger`.

pub mod category;
pub mod product;
pub mod store;
pub mod supplier;

pub use category::Category;
pub use product::Product;
pub use store::{
    CategoryStore, InMemoryCategoryStore, InMemoryProductStore, InMemorySupplierStore,
    ProductStore, SupplierStore,
};
pub use supplier::Supplier;
