//! Projection and translation benchmarks
//!
//! Cost of crossing the boundary: wrapping a native share, dropping the
//! wrapper, and turning a native status into a failure.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use otio_bridge::bindings::composition;
use otio_bridge::{project, translate, BridgeConfig, BridgeContext, ProjectionPolicy};
use otio_native::{ErrorStatus, Outcome, RationalTime, SchemaKind, SerializableObject, TimeRange, TRACK_KIND_VIDEO};

fn context(policy: ProjectionPolicy) -> BridgeContext {
    let mut config = BridgeConfig::default();
    config.registry.projection = policy;
    BridgeContext::new(config)
}

fn bench_project_drop(c: &mut Criterion) {
    let clip = SerializableObject::new(SchemaKind::Clip);
    let mut group = c.benchmark_group("project_drop");

    for (label, policy) in [("fresh", ProjectionPolicy::Fresh), ("reuse_live", ProjectionPolicy::ReuseLive)] {
        let ctx = context(policy);
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter(|| drop(black_box(project(&ctx, clip.clone()))));
        });
    }
    group.finish();
}

fn bench_children(c: &mut Criterion) {
    let mut group = c.benchmark_group("children");

    for size in [10usize, 100, 1000] {
        let ctx = BridgeContext::default();
        let track = composition::create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        for i in 0..size {
            let range = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(1.0 + i as f64, 24.0));
            let gap = otio_bridge::bindings::item::create_gap(&ctx, range);
            composition::append_child(&track, &gap).expect("append gap");
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &track, |b, track| {
            b.iter(|| black_box(composition::children(track).expect("children")));
        });
    }
    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let ctx = BridgeContext::default();
    let plain = ErrorStatus::with_details(Outcome::IllegalIndex, "index 3 out of range");
    let with_object = ErrorStatus::with_object(
        Outcome::ObjectWithoutDuration,
        "no duration",
        SerializableObject::new(SchemaKind::Marker),
    );

    c.bench_function("translate_plain", |b| {
        b.iter(|| black_box(translate(&ctx, black_box(&plain))));
    });
    c.bench_function("translate_with_object", |b| {
        b.iter(|| black_box(translate(&ctx, black_box(&with_object))));
    });
}

criterion_group!(benches, bench_project_drop, bench_children, bench_translate);
criterion_main!(benches);
