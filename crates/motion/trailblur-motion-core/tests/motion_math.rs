use std::f64::consts::PI;

use trailblur_motion::{
    build_motion, DeltaModel, Mat3, SampleDirection, Transform, Vec2, MOTION_EPSILON,
};

fn base() -> Transform {
    Transform::new(Vec2::new(4.0, -2.0), Vec2::new(30.0, 12.0), 15.0, Vec2::new(1.5, 0.8))
}

#[test]
fn moved_is_false_for_identical_transforms() {
    let t = base();
    assert!(!DeltaModel::new(&t, &t).moved());
}

#[test]
fn moved_detects_each_single_field_change() {
    let bump = MOTION_EPSILON * 20.0;
    let variants: Vec<(&str, Transform)> = vec![
        ("center.x", Transform { center: base().center + Vec2::new(bump, 0.0), ..base() }),
        ("center.y", Transform { center: base().center + Vec2::new(0.0, bump), ..base() }),
        ("position.x", Transform { position: base().position + Vec2::new(bump, 0.0), ..base() }),
        ("position.y", Transform { position: base().position + Vec2::new(0.0, bump), ..base() }),
        // Rotation is compared in radians.
        ("rotation", Transform { rotation_deg: base().rotation_deg + bump.to_degrees(), ..base() }),
        ("scale.x", Transform { scale: base().scale + Vec2::new(bump, 0.0), ..base() }),
        ("scale.y", Transform { scale: base().scale + Vec2::new(0.0, bump), ..base() }),
    ];
    for (field, to) in variants {
        assert!(DeltaModel::new(&base(), &to).moved(), "{field} change not detected");
    }
}

fn assert_identity(m: &Mat3, tol: f64) {
    let diff = m.max_abs_diff(&Mat3::IDENTITY);
    assert!(diff <= tol, "not identity (max diff {diff}): {m:?}");
}

#[test]
fn inverse_composed_with_forward_is_identity() {
    let targets = [
        Transform::new(Vec2::ZERO, Vec2::new(130.0, -40.0), 70.0, Vec2::new(2.0, 0.5)),
        Transform::new(Vec2::new(9.0, 9.0), Vec2::new(30.0, 12.0), -120.0, Vec2::new(1.5, 0.8)),
        Transform::new(Vec2::ZERO, Vec2::ZERO, 179.0, Vec2::splat(3.0)),
        Transform::new(Vec2::ZERO, Vec2::new(-5.0, 5.0), 15.0, Vec2::splat(0.01)),
    ];
    for to in targets {
        let delta = DeltaModel::new(&base(), &to);
        for amt in [0.1, 0.5, 1.0] {
            let fwd = build_motion(&delta, amt, 1, SampleDirection::Forward);
            let inv = build_motion(&delta, amt, 1, SampleDirection::Inverse);
            assert_identity(&(inv.matrix * fwd.matrix), 1e-9);
            assert_identity(&(fwd.matrix * inv.matrix), 1e-9);
            let drift_sum = fwd.drift + inv.drift;
            assert!(drift_sum.norm() < 1e-12);
        }
    }
}

#[test]
fn uniform_scale_forward_is_scaled_rotation() {
    let from = Transform::default();
    let to = Transform::new(Vec2::ZERO, Vec2::ZERO, 90.0, Vec2::splat(4.0));
    let delta = DeltaModel::new(&from, &to);
    let m = build_motion(&delta, 0.5, 1, SampleDirection::Forward).matrix;
    // Half of 90deg, sqrt of 4x.
    let (s, c) = (PI / 4.0).sin_cos();
    let expected = [[2.0 * c, -2.0 * s], [2.0 * s, 2.0 * c]];
    for r in 0..2 {
        for col in 0..2 {
            assert!((m.m[r][col] - expected[r][col]).abs() < 1e-12);
        }
    }
}

#[test]
fn drift_scales_with_step_and_flips_on_inverse() {
    let from = Transform::default();
    let to = Transform::new(Vec2::new(-10.0, 4.0), Vec2::ZERO, 0.0, Vec2::ONE);
    let delta = DeltaModel::new(&from, &to);
    let fwd = build_motion(&delta, 1.0, 4, SampleDirection::Forward);
    assert_eq!(fwd.drift, Vec2::new(2.5, -1.0));
    let inv = build_motion(&delta, 1.0, 4, SampleDirection::Inverse);
    assert_eq!(inv.drift, Vec2::new(-2.5, 1.0));
}
