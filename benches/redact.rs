use criterion::{criterion_group, criterion_main, Criterion};
use region_redact::compactness::evaluate;
use region_redact::geo::Cartesian3;
use region_redact::protocol::RedactionRequest;
use region_redact::{
    extract_visible_polygons, Feature, FeatureCollection, PolygonGraphics, DEFAULT_K_THRESHOLD,
};

/// A 50x50 grid of small cells east of 76°E, every other row stretched thin.
fn grid() -> FeatureCollection {
    let mut collection = FeatureCollection::new("grid");
    for row in 0..50 {
        for col in 0..50 {
            let west = 76. + col as f64 * 0.02;
            let south = 39. + row as f64 * 0.02;
            let height = if row % 2 == 0 { 0.01 } else { 0.002 };
            let ring = vec![
                Cartesian3::from_degrees(west, south, 0.),
                Cartesian3::from_degrees(west + 0.01, south, 0.),
                Cartesian3::from_degrees(west + 0.01, south + height, 0.),
                Cartesian3::from_degrees(west, south + height, 0.),
            ];
            let id = format!("cell-{}-{}", row, col);
            collection.push(Feature::new(id).with_polygon(PolygonGraphics::new(ring)));
        }
    }
    collection
}

pub fn extract_bench(c: &mut Criterion) {
    let layers = vec![grid()];
    let mut group = c.benchmark_group("grid");
    group.sample_size(10);
    group.bench_function("extract_visible_polygons", |b| {
        b.iter(|| extract_visible_polygons(&layers, 0.))
    });
    group.finish();
}

pub fn evaluate_bench(c: &mut Criterion) {
    let request = RedactionRequest {
        features: extract_visible_polygons(&[grid()], 0.)
            .into_iter()
            .map(Into::into)
            .collect(),
        k_threshold: DEFAULT_K_THRESHOLD,
    };
    let mut group = c.benchmark_group("grid");
    group.sample_size(10);
    group.bench_function("evaluate", |b| b.iter(|| evaluate(&request)));
    group.finish();
}

criterion_group!(benches, extract_bench, evaluate_bench);
criterion_main!(benches);
