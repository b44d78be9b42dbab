use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use salestable::*;

const STATES: [&str; 6] = ["CA", "TX", "NY", "FL", "WA", "ZZ"];

/// A synthetic Etsy-style export with `rows` line items spread over 2022.
fn export_csv(rows: usize) -> String {
    let mut csv = String::from("Sale Date,Order ID,Full Name,Number of Items,Ship Country,Ship State\n");
    for i in 0..rows {
        let month = i % 12 + 1;
        let day = i % 28 + 1;
        let country = if i % 10 == 0 { "Canada" } else { "United States" };
        csv.push_str(&format!(
            "{:02}/{:02}/22,{},Buyer Number {},{},{},{}\n",
            month,
            day,
            i / 2,
            i,
            i % 4 + 1,
            country,
            STATES[i % STATES.len()]
        ));
    }
    csv
}

fn bench_csv_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_load");

    for size in [100, 1000, 10000].iter() {
        let csv = export_csv(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &csv, |b, csv| {
            b.iter(|| Table::from_csv_str("orders", black_box(csv)).unwrap());
        });
    }
    group.finish();
}

fn bench_mask_and_enrich(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_and_enrich");

    for size in [100, 1000, 10000].iter() {
        let table = Table::from_csv_str("orders", &export_csv(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| {
                let masked = mask_columns(black_box(table), &["Full Name"], '*').unwrap();
                add_date_columns(&masked, "Sale Date").unwrap()
            });
        });
    }
    group.finish();
}

fn bench_aggregates(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregates");
    let config = DashboardConfig::default();

    for size in [1000, 10000].iter() {
        let table = Table::from_csv_str("orders", &export_csv(*size)).unwrap();
        let enriched = add_date_columns(&table, "Sale Date").unwrap();

        group.bench_with_input(BenchmarkId::new("monthly", size), &enriched, |b, t| {
            b.iter(|| monthly_totals(black_box(t), "Number of Items").unwrap());
        });
        group.bench_with_input(BenchmarkId::new("daily", size), &enriched, |b, t| {
            b.iter(|| daily_series(black_box(t), "Number of Items").unwrap());
        });
        group.bench_with_input(BenchmarkId::new("states_top_10", size), &enriched, |b, t| {
            b.iter(|| {
                let raw = orders_by_state(black_box(t), &config.columns, "United States").unwrap();
                top_n_with_others(&clean_orders_by_state(&raw), 10, "Others")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_csv_load, bench_mask_and_enrich, bench_aggregates);
criterion_main!(benches);
