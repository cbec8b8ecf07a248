//! Engine performance benchmarks.
//!
//! Measures profiling and widget aggregation across dataset sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabula::input::Row;
use tabula::{
    Aggregation, ChartType, ColumnType, Dashboard, Dataset, Engine, RawValue, Template, Widget,
    WidgetAggregator,
};

const REGIONS: &[&str] = &["East", "West", "North", "South"];
const PRODUCTS: &[&str] = &["Widget", "Gadget", "Gizmo", "Doohickey", "Thingamajig"];

/// Generate a sales dataset with a date, two categories and a measure.
fn generate_sales(rows: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = (0..rows)
        .map(|_| {
            let mut row = Row::new();
            row.insert(
                "day".to_string(),
                RawValue::from(format!("2024-{:02}-{:02}", rng.gen_range(1..=12), rng.gen_range(1..=28))),
            );
            row.insert(
                "region".to_string(),
                RawValue::from(REGIONS[rng.gen_range(0..REGIONS.len())]),
            );
            row.insert(
                "product".to_string(),
                RawValue::from(PRODUCTS[rng.gen_range(0..PRODUCTS.len())]),
            );
            let sales = if rng.gen_bool(0.05) {
                RawValue::Null
            } else {
                RawValue::Number(rng.gen_range(1.0..500.0))
            };
            row.insert("sales".to_string(), sales);
            row
        })
        .collect();
    Dataset::new("sales", rows)
}

fn template() -> Template {
    Template::new("Sales")
        .with_column("day", ColumnType::Date)
        .with_column("region", ColumnType::Text)
        .with_column("product", ColumnType::Text)
        .with_column("sales", ColumnType::Number)
}

/// Benchmark full analysis (profiles plus suggestions).
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let engine = Engine::new();
    let template = template();

    for rows in [1_000, 10_000, 100_000].iter() {
        let dataset = generate_sales(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(engine.analyze(dataset, &template).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark each aggregation arity.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let aggregator = WidgetAggregator::new();
    let dataset = generate_sales(10_000);

    let cases: [(&str, &[&str], Option<Aggregation>); 4] = [
        ("histogram", &["region"], Some(Aggregation::Count)),
        ("scalar", &["sales"], Some(Aggregation::Avg)),
        ("grouped", &["region", "sales"], Some(Aggregation::Sum)),
        ("pivot", &["day", "product", "sales"], Some(Aggregation::Sum)),
    ];

    for (name, columns, aggregation) in cases {
        group.bench_function(name, |b| {
            b.iter(|| black_box(aggregator.aggregate(&dataset, columns, aggregation, None).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark rendering a six-widget dashboard, parallel against sequential.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let dataset = generate_sales(10_000);

    let dashboard = Dashboard::new("Sales")
        .with_widget(Widget::new(ChartType::Kpi, "Total", ["sales"]).with_aggregation(Aggregation::Sum))
        .with_widget(
            Widget::new(ChartType::Line, "Sales by day", ["day", "sales"])
                .with_position(1)
                .with_aggregation(Aggregation::Sum),
        )
        .with_widget(
            Widget::new(ChartType::Bar, "Sales by region", ["region", "sales"])
                .with_position(2)
                .with_aggregation(Aggregation::Avg),
        )
        .with_widget(
            Widget::new(ChartType::Line, "Product trend", ["day", "product", "sales"])
                .with_position(3)
                .with_aggregation(Aggregation::Sum),
        )
        .with_widget(
            Widget::new(ChartType::Pie, "Regions", ["region"])
                .with_position(4)
                .with_aggregation(Aggregation::Count),
        )
        .with_widget(Widget::new(ChartType::Table, "Preview", ["day", "region", "sales"]).with_position(5));

    for parallel in [true, false] {
        let mut config = tabula::EngineConfig::default();
        config.render.parallel = parallel;
        let engine = Engine::with_config(config);
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| b.iter(|| black_box(engine.render(&dashboard, &dataset))));
    }

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_aggregate, bench_render);
criterion_main!(benches);
