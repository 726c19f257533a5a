use criterion::{criterion_group, criterion_main, Criterion};
use honeycomb_schema::{CodecConfig, ColumnSchema, ColumnType};
use std::hint::black_box;

fn bench_schema() -> ColumnSchema {
    ColumnSchema::builder("amount", ColumnType::Decimal)
        .and_then(|b| b.scale(2))
        .and_then(|b| b.precision(18))
        .map(|b| b.nullable(false))
        .and_then(|b| b.build())
        .expect("build schema")
}

fn bench_codec(c: &mut Criterion) {
    let schema = bench_schema();
    let binary = schema.serialize();
    let json = schema
        .encode_with(&CodecConfig::json())
        .expect("encode json");

    c.bench_function("codec/serialize_binary", |b| {
        b.iter(|| black_box(black_box(&schema).serialize()));
    });

    c.bench_function("codec/deserialize_binary", |b| {
        b.iter(|| {
            let decoded =
                ColumnSchema::deserialize(black_box(&binary), "amount").expect("decode binary");
            black_box(decoded);
        });
    });

    c.bench_function("codec/deserialize_json", |b| {
        b.iter(|| {
            let decoded =
                ColumnSchema::deserialize(black_box(&json), "amount").expect("decode json");
            black_box(decoded);
        });
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
