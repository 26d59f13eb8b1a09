//! Per-call object context and transform inputs.

use serde::{Deserialize, Serialize};
use trailblur_motion::{FamilyId, Transform, TransformSnapshot, Vec2, MAX_SLOTS};

/// Where in the pass this call sits, and what the object looks like on screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallContext {
    /// Effect name; hosts keep one cache table per name.
    pub name: String,
    pub resolution: Vec2,
    pub pivot: Vec2,
    pub family: FamilyId,
    pub slot: usize,
    /// Live objects of this family on the current frame, at most [`MAX_SLOTS`].
    pub slot_count: usize,
    pub frame: u32,
    /// Frames in the configured range.
    pub frame_count: u32,
}

impl CallContext {
    #[inline]
    pub fn is_last_slot(&self) -> bool {
        self.slot.saturating_add(1) == self.slot_count
    }

    #[inline]
    pub fn is_last_frame(&self) -> bool {
        self.frame.saturating_add(1) == self.frame_count
    }
}

/// Context as the host sends it.
#[derive(Clone, Debug, Deserialize)]
pub struct RawContext {
    #[serde(default = "default_name")]
    pub name: String,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub cx: f64,
    #[serde(default)]
    pub cy: f64,
    pub id: i64,
    pub idx: i64,
    pub num: i64,
    pub frame: i64,
    pub range: i64,
}

fn default_name() -> String {
    "motion_blur".to_string()
}

fn non_negative<T: TryFrom<i64> + Default>(v: i64) -> T {
    T::try_from(v.max(0)).unwrap_or_default()
}

impl From<RawContext> for CallContext {
    fn from(raw: RawContext) -> Self {
        let slot: usize = non_negative(raw.idx);
        let slot_count = non_negative::<usize>(raw.num).clamp(1, MAX_SLOTS);
        Self {
            name: raw.name,
            resolution: Vec2::new(raw.w, raw.h),
            pivot: Vec2::new(raw.cx, raw.cy),
            family: FamilyId(non_negative(raw.id)),
            slot,
            slot_count,
            frame: non_negative(raw.frame),
            frame_count: non_negative(raw.range),
        }
    }
}

/// Host transform fields (`cx, cy, x, y, rz, sx, sy`); scale defaults to 1.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct RawTransform {
    pub cx: f64,
    pub cy: f64,
    pub x: f64,
    pub y: f64,
    pub rz: f64,
    pub sx: f64,
    pub sy: f64,
}

impl Default for RawTransform {
    fn default() -> Self {
        Self {
            cx: 0.0,
            cy: 0.0,
            x: 0.0,
            y: 0.0,
            rz: 0.0,
            sx: 1.0,
            sy: 1.0,
        }
    }
}

impl From<RawTransform> for Transform {
    fn from(r: RawTransform) -> Self {
        Transform::new(
            Vec2::new(r.cx, r.cy),
            Vec2::new(r.x, r.y),
            r.rz,
            Vec2::new(r.sx, r.sy),
        )
    }
}

/// Host adjustment fields (`cx, cy, ox, oy, rz, sx, sy`); scale defaults to 1.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct RawAdjustment {
    pub cx: f64,
    pub cy: f64,
    pub ox: f64,
    pub oy: f64,
    pub rz: f64,
    pub sx: f64,
    pub sy: f64,
}

impl Default for RawAdjustment {
    fn default() -> Self {
        Self {
            cx: 0.0,
            cy: 0.0,
            ox: 0.0,
            oy: 0.0,
            rz: 0.0,
            sx: 1.0,
            sy: 1.0,
        }
    }
}

impl RawAdjustment {
    pub fn into_snapshot(self, frame: u32) -> TransformSnapshot {
        TransformSnapshot::new(
            frame,
            Vec2::new(self.cx, self.cy),
            Vec2::new(self.ox, self.oy),
            self.rz,
            Vec2::new(self.sx, self.sy),
        )
    }
}

/// Transform data for one call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionInput {
    pub current: Transform,
    /// Host-evaluated transform one frame earlier; `None` means "same as current".
    pub previous: Option<Transform>,
    /// This frame's adjustments; cached for later calls.
    pub snapshot: TransformSnapshot,
}

impl MotionInput {
    pub fn new(current: Transform, previous: Option<Transform>, snapshot: TransformSnapshot) -> Self {
        Self {
            current,
            previous,
            snapshot,
        }
    }

    /// Input with no adjustments for `frame`.
    pub fn plain(current: Transform, previous: Option<Transform>, frame: u32) -> Self {
        Self::new(current, previous, TransformSnapshot::neutral(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_context_clamps_negative_indices() {
        let raw: RawContext = serde_json::from_str(
            r#"{ "w": 1920, "h": 1080, "id": -3, "idx": -1, "num": 0, "frame": 4, "range": 10 }"#,
        )
        .unwrap();
        let ctx = CallContext::from(raw);
        assert_eq!(ctx.name, "motion_blur");
        assert_eq!(ctx.family, FamilyId(0));
        assert_eq!(ctx.slot, 0);
        assert_eq!(ctx.slot_count, 1);
        assert!(ctx.is_last_slot());
        assert!(!ctx.is_last_frame());
    }

    #[test]
    fn raw_context_caps_slot_count() {
        let raw: RawContext = serde_json::from_str(
            r#"{ "w": 8, "h": 8, "id": 1, "idx": 0, "num": 9223372036854775807, "frame": 0, "range": 1 }"#,
        )
        .unwrap();
        let ctx = CallContext::from(raw);
        assert_eq!(ctx.slot_count, MAX_SLOTS);
        assert!(ctx.is_last_frame());
    }

    #[test]
    fn raw_transform_defaults_to_unit_scale() {
        let t: Transform = serde_json::from_str::<RawTransform>(r#"{ "x": 3 }"#)
            .unwrap()
            .into();
        assert_eq!(t.position, Vec2::new(3.0, 0.0));
        assert_eq!(t.scale, Vec2::ONE);
    }
}
