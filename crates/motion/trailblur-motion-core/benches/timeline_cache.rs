//! Criterion benchmarks for the per-call hot paths: cache write/read across a
//! timeline and sub-frame matrix construction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trailblur_motion::{
    build_motion, CacheMode, DeltaModel, FamilyId, SampleDirection, TimelineCache, Transform,
    TransformSnapshot, Vec2,
};

fn bench_cache_timeline(c: &mut Criterion) {
    c.bench_function("cache_write_read_240_frames_x16_slots", |b| {
        b.iter(|| {
            let mut cache = TimelineCache::new();
            let fam = FamilyId(1);
            for frame in 0..240u32 {
                for slot in 0..16usize {
                    cache.resize(fam, slot, 16, CacheMode::Full);
                    let snap = TransformSnapshot::neutral(frame);
                    cache.overwrite(fam, slot, frame + 1, snap);
                    black_box(cache.read(fam, slot, frame));
                }
            }
            cache
        });
    });
}

fn bench_build_motion(c: &mut Criterion) {
    let from = Transform::new(Vec2::ZERO, Vec2::new(10.0, 4.0), 5.0, Vec2::new(1.0, 1.2));
    let to = Transform::new(Vec2::new(1.0, 0.0), Vec2::new(80.0, -20.0), 40.0, Vec2::splat(0.7));
    let delta = DeltaModel::new(&from, &to);

    c.bench_function("build_motion_inverse", |b| {
        b.iter(|| build_motion(black_box(&delta), 0.5, black_box(63), SampleDirection::Inverse));
    });
}

criterion_group!(benches, bench_cache_timeline, bench_build_motion);
criterion_main!(benches);
