//! Benchmarks for the cell classification pipeline and the JSON
//! highlighter, which run once per visible cell on every redraw.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use tabgaze::classify::classify;
use tabgaze::highlight::highlight;

fn bench_classify(c: &mut Criterion) {
    let json_cell = Value::String(
        r#"{"name":"Ada","tags":["ops","admin"],"quota":{"used":12,"max":100}}"#.to_string(),
    );
    let csv_cell = Value::String(
        "id,name,city\n1,alice,berlin\n2,bob,paris\n3,carol,lima\n4,dave,oslo".to_string(),
    );
    let epoch_cell = json!(1_700_000_000_000_i64);
    let text_cell = Value::String("plain notes without any structure to them".repeat(4));

    let mut group = c.benchmark_group("classify");
    group.bench_function("json_string", |b| {
        b.iter(|| classify(black_box(&json_cell), Some("profile")))
    });
    group.bench_function("csv_string", |b| {
        b.iter(|| classify(black_box(&csv_cell), Some("export")))
    });
    group.bench_function("epoch_millis", |b| {
        b.iter(|| classify(black_box(&epoch_cell), Some("createdAt")))
    });
    group.bench_function("plain_text", |b| {
        b.iter(|| classify(black_box(&text_cell), Some("notes")))
    });
    group.finish();
}

fn bench_highlight(c: &mut Criterion) {
    let value = json!({
        "user": {"name": "Ada Lovelace", "id": 1815},
        "roles": ["admin", "ops", "review"],
        "active": true,
        "deleted": null,
        "scores": [1.5, 2.25, -3.75, 1e6]
    });

    c.bench_function("highlight/nested_object", |b| {
        b.iter(|| highlight(black_box(&value)))
    });
}

criterion_group!(benches, bench_classify, bench_highlight);
criterion_main!(benches);
