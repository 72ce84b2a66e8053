use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use formtree::prelude::*;
use formtree::{value, Log, Path, Value};

fn order_format() -> RecordFormat {
    let item = RecordFormat::builder()
        .required("sku", TextFormat::new().trimmed().min_length(1))
        .required("qty", NumberFormat::new().is_integer().is_min(1))
        .required("gift", BoolFormat::new())
        .build()
        .unwrap();
    RecordFormat::builder()
        .required("items", SequenceFormat::of(item))
        .required("ship", DateFormat::new())
        .build()
        .unwrap()
}

fn order(items: usize, bad_every: usize) -> Value {
    let items: Vec<Value> = (0..items)
        .map(|i| {
            let qty = if bad_every > 0 && i % bad_every == 0 { "x" } else { " 3 " };
            value!({ "sku": "A-1", "qty": qty, "gift": "on" })
        })
        .collect();
    value!({ "items": items, "ship": "2024-06-01" })
}

fn benchmark_leaf_modes(c: &mut Criterion) {
    let number = NumberFormat::new().is_min(0).is_integer();
    let input = value!("  +000123456789.000 ");

    let mut group = c.benchmark_group("number_leaf");
    group.bench_function("apply", |b| b.iter(|| number.apply(black_box(&input))));
    group.bench_function("extract", |b| {
        b.iter(|| {
            let mut log = Log::new();
            number.extract(black_box(&input), &mut log, &Path::Root)
        })
    });
    group.finish();
}

fn benchmark_valid_orders(c: &mut Criterion) {
    let format = order_format();
    let mut group = c.benchmark_group("valid_order");

    for size in [1, 10, 100].iter() {
        let input = order(*size, 0);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| {
                let mut log = Log::new();
                format.extract(black_box(input), &mut log, &Path::Root)
            })
        });
    }
    group.finish();
}

fn benchmark_invalid_orders(c: &mut Criterion) {
    let format = order_format();
    let input = order(100, 3);

    let mut group = c.benchmark_group("invalid_order");
    group.bench_function("full_log", |b| {
        b.iter(|| {
            let mut log = Log::new();
            format.extract(black_box(&input), &mut log, &Path::Root)
        })
    });
    group.bench_function("check", |b| b.iter(|| format.check(black_box(&input))));
    group.finish();
}

criterion_group!(
    benches,
    benchmark_leaf_modes,
    benchmark_valid_orders,
    benchmark_invalid_orders
);
criterion_main!(benches);
