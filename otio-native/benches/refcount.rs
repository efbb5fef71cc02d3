use criterion::{black_box, criterion_group, criterion_main, Criterion};
use otio_native::{RationalTime, SchemaKind, SerializableObject, TimeRange, TRACK_KIND_VIDEO};

fn bench_refcount(c: &mut Criterion) {
    let clip = SerializableObject::new(SchemaKind::Clip);

    c.bench_function("retainer_clone_drop", |b| {
        b.iter(|| {
            let share = black_box(clip.clone());
            drop(share);
        });
    });

    c.bench_function("object_create_destroy", |b| {
        b.iter(|| black_box(SerializableObject::new(SchemaKind::Gap)));
    });
}

fn bench_track_ranges(c: &mut Criterion) {
    let track = SerializableObject::track("V1", TRACK_KIND_VIDEO);
    for i in 0..100 {
        let range = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(10.0 + i as f64, 24.0));
        track
            .append_child(SerializableObject::gap(range))
            .expect("append gap");
    }

    c.bench_function("range_of_all_children_100", |b| {
        b.iter(|| black_box(track.range_of_all_children().expect("ranges")));
    });
}

criterion_group!(benches, bench_refcount, bench_track_ranges);
criterion_main!(benches);
