//! Trailblur Motion Core (host-agnostic)
//!
//! Per-object motion history and the math that turns two transforms into
//! motion-blur samples:
//! - [`TimelineCache`]: sparse `(family, slot, frame position)` snapshot store
//! - [`DeltaModel`]: relative motion between a current and a previous transform
//! - [`build_motion`]: sub-frame homogeneous transforms and drift for a delta
//!
//! Parameter handling, cache policy and the host call boundary live in
//! `trailblur-orchestrator-core`.

pub mod cache;
pub mod delta;
pub mod geom;
pub mod ids;
pub mod modes;
pub mod sampler;
pub mod snapshot;
pub mod transform;

// Re-exports for consumers (orchestrator, hosts)
pub use cache::{CacheConfig, SlotTimeline, TimelineCache, BLOCK_LEN, MAX_SLOTS};
pub use delta::{DeltaModel, MOTION_EPSILON};
pub use geom::{Mat2, Mat3, Vec2};
pub use ids::FamilyId;
pub use modes::{CacheMode, Extrapolation, ModeError, RetentionPolicy};
pub use sampler::{build_motion, sample_steps, step_fraction, Motion, SampleDirection};
pub use snapshot::TransformSnapshot;
pub use transform::{Transform, SCALE_EPSILON};
