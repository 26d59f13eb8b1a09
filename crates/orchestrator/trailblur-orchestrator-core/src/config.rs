//! Parameter bundle handed over by the host on every call, and the clamped
//! form the orchestrator works with.

use serde::{Deserialize, Serialize};
use trailblur_motion::{CacheConfig, CacheMode, Extrapolation, RetentionPolicy};

/// Shutter amounts at or below this disable blur for the call.
pub const SHUTTER_EPSILON: f64 = 1.0e-4;

/// Host parameters as received. Every field is optional on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParams {
    /// Shutter fraction of one frame (0.5 == 180 degrees).
    #[serde(alias = "shutter_fraction")]
    pub amt: f64,
    /// Sample limit for final renders.
    pub smp_lim: i64,
    /// Sample limit while previewing; 0 means "same as render".
    pub preview_smp_lim: i64,
    /// The host is rendering output rather than previewing.
    pub saving: bool,
    /// Extrapolation order 0..=2.
    pub ext: i64,
    /// Cache mode 0..=2.
    pub geo_cache: i64,
    /// Retention policy 0..=3.
    pub cache_ctrl: i64,
    pub resize: bool,
    /// Blend mix in percent.
    pub mix: f64,
    pub print_info: bool,
}

impl Default for RawParams {
    fn default() -> Self {
        Self {
            amt: 0.5,
            smp_lim: 256,
            preview_smp_lim: 0,
            saving: false,
            ext: 2,
            geo_cache: 0,
            cache_ctrl: 0,
            resize: true,
            mix: 0.0,
            print_info: false,
        }
    }
}

impl RawParams {
    /// Set the shutter from an angle in degrees (clamped to 0..=360).
    pub fn with_shutter_angle(mut self, degrees: f64) -> Self {
        self.amt = degrees.clamp(0.0, 360.0) / 360.0;
        self
    }
}

/// Clamped, typed parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionParams {
    pub shutter: f64,
    pub sample_limit: u32,
    pub extrapolation: Extrapolation,
    pub cache_mode: CacheMode,
    pub retention: RetentionPolicy,
    pub resize_canvas: bool,
    /// Blend mix in 0..=1.
    pub mix: f64,
    pub print_info: bool,
    /// Shutter is open and more than one sample is allowed.
    pub is_valid: bool,
}

fn clamp_limit(v: i64) -> u32 {
    u32::try_from(v.max(1)).unwrap_or(u32::MAX)
}

impl From<&RawParams> for MotionParams {
    fn from(raw: &RawParams) -> Self {
        let shutter = raw.amt.max(0.0);
        let render_limit = clamp_limit(raw.smp_lim);
        let sample_limit = if raw.preview_smp_lim > 0 && !raw.saving {
            clamp_limit(raw.preview_smp_lim)
        } else {
            render_limit
        };
        let mix = if raw.mix.is_finite() {
            (raw.mix * 0.01).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            shutter,
            sample_limit,
            extrapolation: Extrapolation::from_clamped(raw.ext),
            cache_mode: CacheMode::from_clamped(raw.geo_cache),
            retention: RetentionPolicy::from_clamped(raw.cache_ctrl),
            resize_canvas: raw.resize,
            mix,
            print_info: raw.print_info,
            is_valid: shutter > SHUTTER_EPSILON && sample_limit > 1,
        }
    }
}

impl From<RawParams> for MotionParams {
    fn from(raw: RawParams) -> Self {
        MotionParams::from(&raw)
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        RawParams::default().into()
    }
}

/// Configuration for the host boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Applied to every cache table the host creates.
    #[serde(default)]
    pub cache: CacheConfig,
}
