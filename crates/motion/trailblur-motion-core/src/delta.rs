//! Relative motion between two transforms.
//!
//! `DeltaModel::new(from, to)` expresses `to` relative to `from`:
//! - rotation: `to.rotation - from.rotation` (radians)
//! - scale: `to.scale / from.scale` per axis, floored at [`SCALE_EPSILON`]
//! - translation: `diag(1/from.scale) * rotate(to.pos - from.pos, -from.rotation)`,
//!   i.e. in `from`'s own pre-motion frame; sampling re-applies that basis
//! - drift: `from.center - to.center`

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;
use crate::transform::{Transform, SCALE_EPSILON};

/// Threshold below which every motion component counts as "not moved".
pub const MOTION_EPSILON: f64 = 1.0e-4;

#[inline]
fn is_zero(v: f64) -> bool {
    v.abs() < MOTION_EPSILON
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeltaModel {
    rotation: f64,
    /// Reciprocal of `from`'s scale; the basis translation is expressed in.
    base: Vec2,
    scale: Vec2,
    translation: Vec2,
    drift: Vec2,
    moved: bool,
}

impl DeltaModel {
    pub fn new(from: &Transform, to: &Transform) -> Self {
        let from_rot = from.rotation();
        let base = from.scale().recip();
        let rotation = to.rotation() - from_rot;
        let scale = base.hadamard(to.scale()).max_scalar(SCALE_EPSILON);
        let translation = base.hadamard((to.position - from.position).rotate(-from_rot));
        let drift = from.center - to.center;

        let moved = !(is_zero(translation.norm())
            && is_zero(drift.norm())
            && is_zero(scale.x - 1.0)
            && is_zero(scale.y - 1.0)
            && is_zero(rotation));

        Self {
            rotation,
            base,
            scale,
            translation,
            drift,
            moved,
        }
    }

    /// Relative rotation in radians.
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    #[inline]
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    #[inline]
    pub fn drift(&self) -> Vec2 {
        self.drift
    }

    #[inline]
    pub fn base(&self) -> Vec2 {
        self.base
    }

    /// Cheap early-out: `false` when every component is within [`MOTION_EPSILON`].
    #[inline]
    pub fn moved(&self) -> bool {
        self.moved
    }
}
