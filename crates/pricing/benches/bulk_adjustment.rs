use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use pricebook_core::{AggregateId, Price};
use pricebook_pricing::{apply_bulk_percentage, AdjustmentDirection, ProductPrice};
use pricebook_products::ProductId;

fn catalog(size: usize) -> Vec<ProductPrice> {
    (0..size)
        .map(|i| {
            // Spread base prices over three decimals so rounding always has work to do.
            let amount = Decimal::new(1_000 + (i as i64 * 7_919) % 9_999_999, 3);
            ProductPrice::new(
                ProductId::new(AggregateId::new()),
                Price::new(amount).expect("generated prices are non-negative"),
            )
        })
        .collect()
}

fn bench_bulk_adjustment(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_adjustment");

    for size in [10usize, 1_000, 100_000] {
        let items = catalog(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("increase_12_5pct", size), &items, |b, items| {
            b.iter(|| {
                apply_bulk_percentage(
                    black_box(items),
                    AdjustmentDirection::Increase,
                    Decimal::new(125, 1),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("decrease_150pct", size), &items, |b, items| {
            b.iter(|| {
                apply_bulk_percentage(
                    black_box(items),
                    AdjustmentDirection::Decrease,
                    Decimal::from(150),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bulk_adjustment);
criterion_main!(benches);
