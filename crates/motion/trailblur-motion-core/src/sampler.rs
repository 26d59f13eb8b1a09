//! Expand a [`DeltaModel`] into homogeneous sub-frame transforms.
//!
//! Model (per step fraction `f`):
//! - rotation `r = delta.rotation * f`, translation `t = delta.translation * f`
//! - scale `s = delta.scale ^ f` per axis (scale composes multiplicatively)
//! - linear part `A = B * R(r) * B^-1 * diag(s)`, `B = diag(delta.base)`;
//!   with uniform scale this is just `s * R(r)`
//! - forward matrix `[A | t]`, drift `delta.drift * f`
//! - inverse matrix `[A^-1 | -(A^-1 t)]`, drift `-delta.drift * f`
//!
//! `f` is `amt / sample_count` when more than one sample is requested, `amt`
//! otherwise; zero samples yield the identity.

use serde::{Deserialize, Serialize};

use crate::delta::DeltaModel;
use crate::geom::{Mat2, Mat3, Vec2};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleDirection {
    /// Maps the pre-motion frame onto the sampled one (push geometry).
    #[default]
    Forward,
    /// Maps the sampled frame back (pull sampling in a shader).
    Inverse,
}

/// One sampled step: the transform and the pivot drift that goes with it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub matrix: Mat3,
    pub drift: Vec2,
}

impl Default for Motion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Motion {
    pub const fn identity() -> Self {
        Self {
            matrix: Mat3::IDENTITY,
            drift: Vec2::ZERO,
        }
    }
}

/// Fraction of the full delta covered by one step.
#[inline]
pub fn step_fraction(amt: f64, sample_count: u32) -> f64 {
    if sample_count > 1 {
        amt / f64::from(sample_count)
    } else {
        amt
    }
}

/// Build the transform for one step of `delta` spread over `sample_count` samples.
pub fn build_motion(
    delta: &DeltaModel,
    amt: f64,
    sample_count: u32,
    direction: SampleDirection,
) -> Motion {
    if sample_count == 0 {
        return Motion::identity();
    }

    let f = step_fraction(amt, sample_count);
    let r = delta.rotation() * f;
    let s = delta.scale().powf(f);
    let t = delta.translation() * f;

    let base = Mat2::diagonal(delta.base());
    let base_inv = Mat2::diagonal(delta.base().recip());

    match direction {
        SampleDirection::Forward => {
            let linear = base * Mat2::rotation(r) * base_inv * Mat2::diagonal(s);
            Motion {
                matrix: Mat3::from_parts(linear, t),
                drift: delta.drift() * f,
            }
        }
        SampleDirection::Inverse => {
            let linear = Mat2::diagonal(s.recip()) * base * Mat2::rotation(-r) * base_inv;
            Motion {
                matrix: Mat3::from_parts(linear, -(linear * t)),
                drift: -(delta.drift() * f),
            }
        }
    }
}

/// Every step along the path: element `k` covers `amt * (k + 1) / sample_count`.
pub fn sample_steps(
    delta: &DeltaModel,
    amt: f64,
    sample_count: u32,
    direction: SampleDirection,
) -> Vec<Motion> {
    (1..=sample_count)
        .map(|k| {
            let frac = amt * f64::from(k) / f64::from(sample_count);
            build_motion(delta, frac, 1, direction)
        })
        .collect()
}
