//! trailblur-orchestrator
//!
//! Drives one motion-blur call per object per frame on top of
//! `trailblur-motion-core`:
//! - parameter clamping ([`MotionParams`]) and call context ([`CallContext`])
//! - history lookup, frame-0 extrapolation, sample sizing and retention
//!   cleanup ([`Orchestrator`])
//! - canvas growth estimation ([`estimate_margin`])
//! - the JSON host boundary with per-name cache tables ([`MotionHost`])
//!
//! The cache is always passed in; nothing here is process-global.

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod host;
pub mod margin;
pub mod orchestrator;

pub use crate::config::{HostConfig, MotionParams, RawParams, SHUTTER_EPSILON};
pub use crate::context::{CallContext, MotionInput, RawAdjustment, RawContext, RawTransform};
pub use crate::diagnostics::info_text;
pub use crate::host::{version, HostError, HostResult, MotionHost};
pub use crate::margin::{estimate_margin, Margin};
pub use crate::orchestrator::{MotionOutput, Orchestrator, EXTRAPOLATED, ROLLING_LAST, SEED_FIRST};

pub use trailblur_motion as motion;
