//! Canvas growth needed to hold every blur sample.
//!
//! The forward motion is probed at half and full shutter. For each probe the
//! object's box (canvas `res`, pivot at `pivot`) is pushed through the probe
//! matrix; the axis-aligned growth of the box and the shift of its pivot give
//! how far each edge has to move. The half probe catches paths that bow
//! outward mid-shutter under large rotations.

use serde::{Deserialize, Serialize};
use trailblur_motion::{build_motion, DeltaModel, SampleDirection, Vec2};

/// Per-edge canvas growth in whole pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margin {
    pub const ZERO: Margin = Margin {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    fn from_bounds(lo: Vec2, hi: Vec2) -> Self {
        Self {
            left: saturate(lo.x),
            top: saturate(lo.y),
            right: saturate(hi.x),
            bottom: saturate(hi.y),
        }
    }

    /// Leading (left/top) growth.
    #[inline]
    pub fn low(&self) -> Vec2 {
        Vec2::new(f64::from(self.left), f64::from(self.top))
    }

    /// Trailing (right/bottom) growth.
    #[inline]
    pub fn high(&self) -> Vec2 {
        Vec2::new(f64::from(self.right), f64::from(self.bottom))
    }

    /// Samples needed to keep neighbouring samples about a pixel apart:
    /// `ceil(|low + high|)`.
    pub fn required_samples(&self) -> u32 {
        let n = (self.low() + self.high()).norm().ceil();
        if n.is_finite() && n > 0.0 {
            n.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Margin::ZERO
    }

    /// `[left, top, right, bottom]`.
    pub fn to_array(&self) -> [i32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

fn saturate(v: f64) -> i32 {
    if v.is_nan() {
        0
    } else {
        v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}

/// Growth of a `res`-sized canvas pivoting at `pivot` under `delta` over
/// `amt` of a frame. Never negative.
pub fn estimate_margin(delta: &DeltaModel, amt: f64, res: Vec2, pivot: Vec2) -> Margin {
    let mut lo = Vec2::ZERO;
    let mut hi = Vec2::ZERO;

    for frac in [amt * 0.5, amt] {
        let probe = build_motion(delta, frac, 1, SampleDirection::Forward);
        let pos = probe.matrix.transform_point(-pivot + probe.drift) + pivot;
        let bbox = probe.matrix.linear().abs() * res;
        let diff = (bbox - res) * 0.5;
        lo = lo.max((diff - pos).ceil());
        hi = hi.max((diff + pos).ceil());
    }

    Margin::from_bounds(lo, hi)
}
