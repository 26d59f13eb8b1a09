//! Per-call driver: cache bookkeeping, history lookup, sample sizing, cleanup.
//!
//! Cache position layout:
//! - `Full`: frame `f` lives at position `f + 1`; the previous frame is read at `f`.
//! - `Rolling`: position 1 holds the last frame, positions 2 and 3 the seeds
//!   taken on frames 1 and 2.
//! - Both: position 0 holds the value extrapolated on frame 0.

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use trailblur_motion::{
    build_motion, CacheMode, DeltaModel, FamilyId, Mat3, RetentionPolicy, SampleDirection,
    TimelineCache, TransformSnapshot, Vec2,
};

use crate::config::MotionParams;
use crate::context::{CallContext, MotionInput};
use crate::diagnostics::info_text;
use crate::margin::{estimate_margin, Margin};

/// Extrapolated "previous" for frame 0.
pub const EXTRAPOLATED: u32 = 0;
/// Last frame seen, rolling layout.
pub const ROLLING_LAST: u32 = 1;
/// First seed position; the second seed follows it.
pub const SEED_FIRST: u32 = 2;

/// Everything the renderer needs for one object on one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionOutput {
    /// Canvas growth (zero when canvas resizing is off).
    pub margin: Margin,
    /// Samples to draw; 0 means no blur.
    pub samples: u32,
    /// Samples the motion would need without the limit.
    pub required_samples: u32,
    /// Pull-sampling (inverse) step transform.
    pub matrix: Mat3,
    pub drift: Vec2,
    pub mix: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl MotionOutput {
    /// Matrix (row-major), drift, sample count and mix, packed for a shader.
    pub fn shader_constants(&self) -> Vec<f32> {
        let mut out: Vec<f32> = self
            .matrix
            .to_row_major()
            .iter()
            .map(|v| *v as f32)
            .collect();
        out.extend(self.drift.to_array().iter().map(|v| *v as f32));
        out.push(self.samples as f32);
        out.push(self.mix as f32);
        out
    }

    #[inline]
    pub fn is_blurred(&self) -> bool {
        self.samples > 0
    }
}

/// Runs one call against a borrowed cache. Holds no state of its own.
pub struct Orchestrator<'c> {
    cache: &'c mut TimelineCache,
}

impl<'c> Orchestrator<'c> {
    pub fn new(cache: &'c mut TimelineCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &TimelineCache {
        &*self.cache
    }

    /// Compute blur parameters for one object on one frame and update the
    /// cache for later calls.
    ///
    /// `persisted` is the host's per-object blob: it receives a successful
    /// frame-0 extrapolation, stands in for one that lacks seeds, and is reset
    /// to the sentinel while caching is disabled.
    pub fn compute(
        &mut self,
        params: &MotionParams,
        ctx: &CallContext,
        input: &MotionInput,
        mut persisted: Option<&mut TransformSnapshot>,
    ) -> MotionOutput {
        let mode = params.cache_mode;
        let rolling = mode == CacheMode::Rolling;
        let seeding = mode == CacheMode::Full || (rolling && (ctx.frame == 1 || ctx.frame == 2));

        self.cache.resize(ctx.family, ctx.slot, ctx.slot_count, mode);
        if !mode.is_enabled() {
            if let Some(blob) = persisted.as_deref_mut() {
                if blob.is_valid() {
                    *blob = TransformSnapshot::sentinel();
                }
            }
        }

        let current = TransformSnapshot {
            frame_tag: ctx.frame,
            ..input.snapshot
        };

        if seeding {
            self.cache
                .overwrite(ctx.family, ctx.slot, ctx.frame.saturating_add(1), current);
        }

        let previous = if !mode.is_enabled() {
            None
        } else if ctx.frame == 0 {
            self.extrapolate(params, ctx, &current, persisted)
        } else {
            let pos = if rolling { ROLLING_LAST } else { ctx.frame };
            self.cache.read(ctx.family, ctx.slot, pos).copied()
        };
        let previous = previous.unwrap_or(current);

        let to = input
            .previous
            .unwrap_or(input.current)
            .with_snapshot(&previous);
        let from = input.current.with_snapshot(&current);
        let delta = DeltaModel::new(&from, &to);

        let active = params.is_valid && (params.extrapolation.is_enabled() || ctx.frame != 0);
        let (margin, required, samples) = if active && delta.moved() {
            let margin = estimate_margin(&delta, params.shutter, ctx.resolution, ctx.pivot);
            let required = margin.required_samples();
            let samples = required.min(params.sample_limit.saturating_sub(1));
            (margin, required, samples)
        } else {
            (Margin::ZERO, 0, 0)
        };

        let motion = build_motion(&delta, params.shutter, samples, SampleDirection::Inverse);

        if rolling {
            self.cache.write(ctx.family, ctx.slot, ROLLING_LAST, current);
        }

        self.cleanup(params, ctx);

        let info = params.print_info.then(|| {
            let text = info_text(ctx, required);
            info!("{text}");
            text
        });

        trace!(
            "motion: family={} slot={} frame={} required={} samples={}",
            ctx.family.0,
            ctx.slot,
            ctx.frame,
            required,
            samples
        );

        MotionOutput {
            margin: if params.resize_canvas {
                margin
            } else {
                Margin::ZERO
            },
            samples,
            required_samples: required,
            matrix: motion.matrix,
            drift: motion.drift,
            mix: params.mix,
            info,
        }
    }

    /// Synthesize the snapshot before frame 0 from the seeds after it.
    fn extrapolate(
        &mut self,
        params: &MotionParams,
        ctx: &CallContext,
        current: &TransformSnapshot,
        persisted: Option<&mut TransformSnapshot>,
    ) -> Option<TransformSnapshot> {
        let order = params.extrapolation.order();
        if order == 0 {
            return None;
        }

        let seeds: Vec<TransformSnapshot> = (SEED_FIRST..)
            .take(order)
            .map_while(|pos| self.cache.read(ctx.family, ctx.slot, pos).copied())
            .collect();

        match params.extrapolation.project(current, &seeds) {
            Some(projected) => {
                self.cache
                    .write(ctx.family, ctx.slot, EXTRAPOLATED, projected);
                let stored = self
                    .cache
                    .read(ctx.family, ctx.slot, EXTRAPOLATED)
                    .copied()
                    .unwrap_or(projected);
                if let Some(blob) = persisted {
                    *blob = stored;
                }
                debug!(
                    "extrapolation: family={} slot={} order={} from seeds",
                    ctx.family.0, ctx.slot, order
                );
                Some(stored)
            }
            None => {
                let fallback = persisted.filter(|blob| blob.is_valid()).map(|blob| *blob);
                debug!(
                    "extrapolation: family={} slot={} missing seeds ({}/{}), persisted={}",
                    ctx.family.0,
                    ctx.slot,
                    seeds.len(),
                    order,
                    fallback.is_some()
                );
                fallback
            }
        }
    }

    /// Apply the retention policy once the last live slot of a frame is done.
    fn cleanup(&mut self, params: &MotionParams, ctx: &CallContext) {
        if !ctx.is_last_slot() {
            return;
        }

        match params.retention {
            RetentionPolicy::Retain => {}
            RetentionPolicy::PurgeAtRangeEnd => {
                if ctx.is_last_frame() {
                    self.purge_family(ctx.family);
                }
            }
            RetentionPolicy::PurgeAll => {
                debug!("retention: clearing every family");
                self.cache.clear();
            }
            RetentionPolicy::PurgeFamily => self.purge_family(ctx.family),
        }
    }

    /// Drop exactly `family`; host ids are not packed, so ids sharing low
    /// bits stay untouched.
    fn purge_family(&mut self, family: FamilyId) {
        debug!("retention: clearing family {}", family.0);
        self.cache.clear_family(family);
    }
}
