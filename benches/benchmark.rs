// Translation throughput on wide and deep schemas
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mongoschema_core::{build_validator, check_structure, translate_fragment, Strictness};
use serde_json::{json, Map, Value};

const JSON_TYPES: [&str; 7] = ["integer", "number", "string", "boolean", "array", "object", "widget"];

fn wide_schema(fields: usize) -> Value {
    let properties: Map<String, Value> = (0..fields)
        .map(|i| {
            let field = match i % 4 {
                0 => json!({ "type": "string", "format": "email" }),
                1 => json!({ "type": "string", "format": "date" }),
                2 => json!({ "type": "array", "items": { "type": JSON_TYPES[i % JSON_TYPES.len()] } }),
                _ => json!({ "type": JSON_TYPES[i % JSON_TYPES.len()], "description": format!("field {}", i) }),
            };
            (format!("field_{}", i), field)
        })
        .collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": properties
    })
}

fn deep_schema(depth: usize) -> Value {
    let mut schema = json!({ "type": "string", "format": "email" });
    for level in 0..depth {
        let key = format!("level_{}", level);
        schema = json!({
            "type": "object",
            "required": [key.clone()],
            "properties": { key: schema }
        });
    }
    schema
}

fn benchmark_build_validator(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_validator");

    for size in [10, 100, 1000].iter() {
        let schema = wide_schema(*size);
        group.bench_with_input(BenchmarkId::new("wide", size), size, |b, _| {
            b.iter(|| {
                let validator = build_validator(black_box(schema.clone())).unwrap();
                check_structure(validator.document(), Strictness::Strict).unwrap();
            });
        });
    }

    group.finish();
}

fn benchmark_translate_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_fragment");

    for depth in [8, 64, 256].iter() {
        let schema = deep_schema(*depth);
        group.bench_with_input(BenchmarkId::new("deep", depth), depth, |b, _| {
            b.iter(|| {
                let mut fragment = schema.clone();
                black_box(translate_fragment(&mut fragment));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build_validator, benchmark_translate_deep);
criterion_main!(benches);
