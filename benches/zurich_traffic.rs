use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use zurich_traffic::{ch_to_wgs_columns, prepare, Record, RecordTable};

fn day_table(rows: usize) -> RecordTable {
    (0..rows)
        .map(|i| {
            let record: Record = json!({
                "MSName": format!("Z{:03}M001", i % 150),
                "ZSName": "Seestrasse",
                "EKoord": format!("{}", 2_680_000 + i % 5_000),
                "NKoord": format!("{}", 1_245_000 + i % 3_000),
                "Richtung": "einwärts",
                "AnzFahrzeuge": format!("{}", i % 900),
                "AnzFahrzeugeStatus": "Gemessen",
                "MessungDatZeit": format!("2024-03-05 {:02}:00:00", i % 24),
            })
            .as_object()
            .cloned()
            .unwrap_or_default();
            record
        })
        .collect()
}

fn bench_preparation(c: &mut Criterion) {
    let table = day_table(10_000);
    c.bench_function("prepare_day", |b| b.iter(|| prepare(black_box(&table))));

    let eastings: Vec<f64> = (0..10_000).map(|i| 680_000.0 + i as f64).collect();
    let northings: Vec<f64> = (0..10_000).map(|i| 245_000.0 + i as f64).collect();
    c.bench_function("ch_to_wgs_columns", |b| {
        b.iter(|| ch_to_wgs_columns(black_box(&eastings), black_box(&northings)))
    });
}

criterion_group!(benches, bench_preparation);
criterion_main!(benches);
