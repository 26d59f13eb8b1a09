//! Criterion benchmarks for a full per-call pass: typed orchestrator calls over
//! a timeline and the JSON host boundary.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use trailblur_orchestrator::motion::{CacheMode, FamilyId, TimelineCache, Transform, Vec2};
use trailblur_orchestrator::{CallContext, MotionHost, MotionInput, MotionParams, Orchestrator};

fn bench_orchestrator_pass(c: &mut Criterion) {
    let params = MotionParams {
        cache_mode: CacheMode::Full,
        ..MotionParams::default()
    };

    c.bench_function("orchestrator_120_frames_x8_slots", |b| {
        b.iter(|| {
            let mut cache = TimelineCache::new();
            for frame in 0..120u32 {
                for slot in 0..8usize {
                    let ctx = CallContext {
                        name: "motion_blur".into(),
                        resolution: Vec2::new(1920.0, 1080.0),
                        pivot: Vec2::ZERO,
                        family: FamilyId(1),
                        slot,
                        slot_count: 8,
                        frame,
                        frame_count: 120,
                    };
                    let x = f64::from(frame) * 12.0 + slot as f64;
                    let input = MotionInput::plain(
                        Transform::new(Vec2::ZERO, Vec2::new(x, 0.0), f64::from(frame), Vec2::ONE),
                        Some(Transform::new(Vec2::ZERO, Vec2::new(x - 12.0, 0.0), 0.0, Vec2::ONE)),
                        frame,
                    );
                    black_box(Orchestrator::new(&mut cache).compute(&params, &ctx, &input, None));
                }
            }
            cache
        });
    });
}

fn bench_host_boundary(c: &mut Criterion) {
    let args: Vec<Value> = vec![
        json!({ "amt": 0.5, "smp_lim": 128, "geo_cache": 2 }),
        json!({ "w": 1280, "h": 720, "id": 3, "idx": 0, "num": 1, "frame": 5, "range": 60 }),
        json!({ "x": 40, "y": 10, "rz": 12 }),
        json!({ "x": 10, "y": 0, "rz": 0 }),
        json!({}),
    ];

    c.bench_function("host_compute_motion_json", |b| {
        let mut host = MotionHost::default();
        b.iter(|| host.compute_motion(black_box(&args)));
    });
}

criterion_group!(benches, bench_orchestrator_pass, bench_host_boundary);
criterion_main!(benches);
