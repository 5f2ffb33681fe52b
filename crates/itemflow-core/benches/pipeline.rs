//! Benchmarks for the itemflow pipeline.
//!
//! Run with: cargo bench -p itemflow-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageFormat};
use itemflow_core::{
    classify, standard_actions, sniff, Config, FixtureLoader, Item, Location, Pipeline,
};
use std::io::Cursor;

fn png_fixture() -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(256, 256)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode fixture");
    bytes
}

fn run_once(item: &Item, config: &Config) -> Item {
    let mut pipeline = Pipeline::new(
        Location::parse("bundle://bench"),
        FixtureLoader::new(item.clone()),
    );
    for action in standard_actions(config) {
        pipeline.add_action(action);
    }
    pipeline.execute().expect("pipeline run")
}

fn benchmark_classify(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| {
            for classifier in ["image/png", "json", "zipfile", "object/json", "other"] {
                let _ = classify(black_box(classifier));
            }
        })
    });
}

fn benchmark_detect_classifier(c: &mut Criterion) {
    let png = png_fixture();
    c.bench_function("detect_classifier_png", |b| {
        b.iter(|| {
            let _ = sniff::detect_classifier(black_box(&png), Some("test.png"));
        })
    });
}

fn benchmark_json_pipeline(c: &mut Criterion) {
    let config = Config::default();
    let document: Vec<u8> = serde_json::to_vec(&serde_json::json!({
        "items": (0..1000).collect::<Vec<u32>>(),
    }))
    .expect("encode fixture");
    let item = Item::from_bytes(document, "json");

    c.bench_function("pipeline_parse_json", |b| {
        b.iter(|| {
            let _ = run_once(black_box(&item), &config);
        })
    });
}

fn benchmark_image_pipeline(c: &mut Criterion) {
    let config = Config::default();
    let item = Item::from_bytes(png_fixture(), "image/png");

    c.bench_function("pipeline_decode_png_256px", |b| {
        b.iter(|| {
            let _ = run_once(black_box(&item), &config);
        })
    });
}

criterion_group!(
    benches,
    benchmark_classify,
    benchmark_detect_classifier,
    benchmark_json_pipeline,
    benchmark_image_pipeline,
);
criterion_main!(benches);
