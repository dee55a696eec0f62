//! Generation performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flutterc::*;
use tempfile::TempDir;

fn bench_demo_render(c: &mut Criterion) {
    let snapshot = Snapshot::from_json_str(include_str!("../demos/news_app.json"), "news_app.json").unwrap();
    let generator = ProjectGenerator::new(GeneratorOptions::default());

    c.bench_function("demo_render", |b| b.iter(|| generator.render(black_box(&snapshot))));
}

fn bench_demo_generate(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("news_app.json");
    std::fs::write(&input_path, include_str!("../demos/news_app.json")).unwrap();
    let output_dir = temp_dir.path().join("build");

    c.bench_function("demo_generate", |b| {
        b.iter(|| generate_project(black_box(&input_path), black_box(&output_dir)).unwrap())
    });
}

/// One screen with a wide, shallow tree of a thousand texts
fn bench_large_screen_render(c: &mut Criterion) {
    let mut widgets = vec![r#"{"id": 1, "widget_type": "Column"}"#.to_string()];
    for i in 0..1000u64 {
        widgets.push(format!(
            r#"{{"id": {}, "widget_type": "Text", "parent": 1, "order": {}, "properties": [
                {{"property_name": "text", "property_type": "string", "string_value": "Item {}"}}]}}"#,
            i + 2,
            i,
            i
        ));
    }
    let json = format!(
        r#"{{"name": "Large", "package_name": "com.example.large",
            "screens": [{{"id": 1, "name": "Home", "route_name": "/home", "widgets": [{}]}}]}}"#,
        widgets.join(",")
    );
    let snapshot = Snapshot::from_json_str(&json, "large").unwrap();
    let generator = ProjectGenerator::new(GeneratorOptions::default());

    c.bench_function("large_screen_render", |b| b.iter(|| generator.render(black_box(&snapshot))));
}

/// A single chain of nested containers close to the depth ceiling
fn bench_deep_tree_render(c: &mut Criterion) {
    let mut widgets = vec![r#"{"id": 1, "widget_type": "Container"}"#.to_string()];
    for id in 2..=60u64 {
        widgets.push(format!(r#"{{"id": {}, "widget_type": "Padding", "parent": {}}}"#, id, id - 1));
    }
    let json = format!(
        r#"{{"name": "Deep", "package_name": "com.example.deep",
            "screens": [{{"id": 1, "name": "Home", "route_name": "/home", "widgets": [{}]}}]}}"#,
        widgets.join(",")
    );
    let snapshot = Snapshot::from_json_str(&json, "deep").unwrap();
    let generator = ProjectGenerator::new(GeneratorOptions::default());

    c.bench_function("deep_tree_render", |b| b.iter(|| generator.render(black_box(&snapshot))));
}

criterion_group!(
    benches,
    bench_demo_render,
    bench_demo_generate,
    bench_large_screen_render,
    bench_deep_tree_render
);
criterion_main!(benches);
