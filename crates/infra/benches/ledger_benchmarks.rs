use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use inventaris_catalog::{InMemoryProductStore, Product, ProductStore};
use inventaris_events::InMemoryEventBus;
use inventaris_ledger::{
    InMemoryTransactionStore, MovementKind, NewMovement, Pagination, StockLedger,
    TransactionFilter,
};

fn bench_record_movement(c: &mut Criterion) {
    let products = Arc::new(InMemoryProductStore::new());
    let transactions = Arc::new(InMemoryTransactionStore::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let ledger = StockLedger::new(products.clone(), transactions, bus);

    let pid = products.allocate_id();
    products
        .save(Product::new(pid, "Benchmark Product", 0, 1.0))
        .unwrap();

    c.bench_function("record_movement_in", |b| {
        b.iter(|| {
            ledger
                .record_movement(NewMovement::new(pid, MovementKind::In, 1))
                .unwrap()
        })
    });
}

fn bench_list_page(c: &mut Criterion) {
    let products = Arc::new(InMemoryProductStore::new());
    let transactions = Arc::new(InMemoryTransactionStore::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let ledger = StockLedger::new(products.clone(), transactions, bus);

    let pid = products.allocate_id();
    products
        .save(Product::new(pid, "Benchmark Product", 0, 1.0))
        .unwrap();
    for _ in 0..1_000 {
        ledger
            .record_movement(NewMovement::new(pid, MovementKind::In, 1))
            .unwrap();
    }

    c.bench_function("list_first_page_of_1000", |b| {
        b.iter(|| {
            ledger
                .list(TransactionFilter::for_product(pid), Pagination::new(1, 10))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_record_movement, bench_list_page);
criterion_main!(benches);
