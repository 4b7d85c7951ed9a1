//! 補貨計算基準測試

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use uuid::Uuid;
use vmi::{RecordedPrice, ReplenishmentPlanner, StockItem};

/// 合成目錄：約三分之一低於下限、三分之一介於上下限之間
fn synthetic_catalog(size: usize) -> Vec<StockItem> {
    let supplier_id = Uuid::new_v4();

    (0..size)
        .map(|index| {
            let current = (index % 30) as i64;
            StockItem::new(
                format!("ITEM-{index:05}"),
                format!("Item sintético {index}"),
                Decimal::from(current),
            )
            .with_levels(Decimal::from(10), Decimal::from(25))
            .with_replenishment_lot(Decimal::from(1 + (index % 7) as i64))
            .with_purchase_price(Decimal::from(3))
            .with_supplier(supplier_id)
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("replenishment_plan");

    for size in [100usize, 1_000, 10_000] {
        let catalog = synthetic_catalog(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| ReplenishmentPlanner::plan(catalog, &RecordedPrice));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
