//! Raw object transform as reported by the host for one point in time.

use serde::{Deserialize, Serialize};

use crate::geom::{to_rad, Vec2};
use crate::snapshot::TransformSnapshot;

/// Lower bound applied to every scale axis before it is used as a divisor.
pub const SCALE_EPSILON: f64 = 1.0e-4;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Declared pivot/center.
    pub center: Vec2,
    pub position: Vec2,
    pub rotation_deg: f64,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            position: Vec2::ZERO,
            rotation_deg: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform {
    pub fn new(center: Vec2, position: Vec2, rotation_deg: f64, scale: Vec2) -> Self {
        Self {
            center,
            position,
            rotation_deg,
            scale,
        }
    }

    /// Translation-only transform with unit scale.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        to_rad(self.rotation_deg)
    }

    /// Scale with each axis floored at [`SCALE_EPSILON`].
    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale.max_scalar(SCALE_EPSILON)
    }

    /// Fold a snapshot's adjustments in: additive on center, position and
    /// rotation, multiplicative on scale. Invalid snapshots are ignored.
    pub fn with_snapshot(mut self, snapshot: &TransformSnapshot) -> Self {
        if !snapshot.is_valid() {
            return self;
        }
        self.center += snapshot.center;
        self.position += snapshot.origin_offset;
        self.rotation_deg += snapshot.rotation_deg;
        self.scale = self.scale.hadamard(snapshot.scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_folds_additively_and_multiplicatively() {
        let t = Transform::new(Vec2::new(1.0, 1.0), Vec2::new(10.0, 0.0), 5.0, Vec2::splat(2.0));
        let s = TransformSnapshot::new(0, Vec2::new(1.0, 0.0), Vec2::new(0.0, 3.0), 10.0, Vec2::new(0.5, 3.0));
        let out = t.with_snapshot(&s);
        assert_eq!(out.center, Vec2::new(2.0, 1.0));
        assert_eq!(out.position, Vec2::new(10.0, 3.0));
        assert_eq!(out.rotation_deg, 15.0);
        assert_eq!(out.scale, Vec2::new(1.0, 6.0));
    }

    #[test]
    fn invalid_snapshot_is_ignored_and_scale_is_floored() {
        let t = Transform::at(Vec2::new(4.0, 4.0));
        assert_eq!(t.with_snapshot(&TransformSnapshot::sentinel()), t);
        let flat = Transform::new(Vec2::ZERO, Vec2::ZERO, 0.0, Vec2::new(0.0, -1.0));
        assert_eq!(flat.scale(), Vec2::splat(SCALE_EPSILON));
    }
}
