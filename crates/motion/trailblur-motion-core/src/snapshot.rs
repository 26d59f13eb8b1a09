//! Per-frame geometry record kept in the timeline cache.
//!
//! A snapshot stores the adjustments an object carried on one frame (extra
//! center shift, origin offset, rotation, per-axis scale). The host can
//! re-evaluate an object's own track at any time, but not these adjustments,
//! so they are what the cache remembers.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub center: Vec2,
    pub origin_offset: Vec2,
    pub rotation_deg: f64,
    pub scale: Vec2,
    pub frame_tag: u32,
    /// `false` marks the sentinel; such a snapshot is never real history.
    pub valid: bool,
}

impl TransformSnapshot {
    pub fn new(
        frame_tag: u32,
        center: Vec2,
        origin_offset: Vec2,
        rotation_deg: f64,
        scale: Vec2,
    ) -> Self {
        Self {
            center,
            origin_offset,
            rotation_deg,
            scale,
            frame_tag,
            valid: true,
        }
    }

    /// A valid snapshot that leaves a transform unchanged when applied.
    pub fn neutral(frame_tag: u32) -> Self {
        Self::new(frame_tag, Vec2::ZERO, Vec2::ZERO, 0.0, Vec2::ONE)
    }

    /// The invalid sentinel.
    #[inline]
    pub fn sentinel() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Same validity and frame tag; data fields are not compared.
    #[inline]
    pub fn same_tag(&self, other: &TransformSnapshot) -> bool {
        self.valid == other.valid && self.frame_tag == other.frame_tag
    }

    fn zip_with(self, rhs: TransformSnapshot, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            center: Vec2::new(f(self.center.x, rhs.center.x), f(self.center.y, rhs.center.y)),
            origin_offset: Vec2::new(
                f(self.origin_offset.x, rhs.origin_offset.x),
                f(self.origin_offset.y, rhs.origin_offset.y),
            ),
            rotation_deg: f(self.rotation_deg, rhs.rotation_deg),
            scale: Vec2::new(f(self.scale.x, rhs.scale.x), f(self.scale.y, rhs.scale.y)),
            ..self
        }
    }
}

// Arithmetic touches the data fields only; tag and validity follow the left operand.

impl Add for TransformSnapshot {
    type Output = TransformSnapshot;
    fn add(self, rhs: TransformSnapshot) -> TransformSnapshot {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for TransformSnapshot {
    type Output = TransformSnapshot;
    fn sub(self, rhs: TransformSnapshot) -> TransformSnapshot {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul<f64> for TransformSnapshot {
    type Output = TransformSnapshot;
    fn mul(self, rhs: f64) -> TransformSnapshot {
        self.zip_with(self, |a, _| a * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_keeps_left_tag() {
        let a = TransformSnapshot::new(3, Vec2::new(1.0, 2.0), Vec2::ZERO, 10.0, Vec2::ONE);
        let b = TransformSnapshot::new(9, Vec2::new(0.5, 0.5), Vec2::ZERO, 4.0, Vec2::splat(2.0));
        let c = a * 2.0 - b;
        assert_eq!(c.frame_tag, 3);
        assert!(c.valid);
        assert_eq!(c.center, Vec2::new(1.5, 3.5));
        assert_eq!(c.rotation_deg, 16.0);
        assert_eq!(c.scale, Vec2::ZERO);
    }

    #[test]
    fn sentinel_is_invalid() {
        let s = TransformSnapshot::sentinel();
        assert!(!s.is_valid());
        assert!(!s.same_tag(&TransformSnapshot::neutral(0)));
        assert!(TransformSnapshot::neutral(4).same_tag(&TransformSnapshot::neutral(4)));
    }
}
