//! Host call boundary.
//!
//! Hosts hand over positional JSON arguments:
//! `[params, context, current, previous | null, adjustments, persisted | null]`
//! (the last one may be omitted). Shape problems are reported as
//! [`HostError`]; a panic inside the call is caught and reported instead of
//! unwinding into the host. Cache tables are kept per effect name.

use std::panic::{catch_unwind, AssertUnwindSafe};

use indexmap::IndexMap;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use trailblur_motion::{TimelineCache, TransformSnapshot};

use crate::config::{HostConfig, MotionParams, RawParams};
use crate::context::{CallContext, MotionInput, RawAdjustment, RawContext, RawTransform};
use crate::orchestrator::{MotionOutput, Orchestrator};

const ARGS_MIN: usize = 5;
const ARGS_MAX: usize = 6;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("incorrect number of arguments: expected 5 or 6, got {0}")]
    ArgumentCount(usize),
    #[error("argument {index} ({name}) has the wrong shape: {source}")]
    ArgumentShape {
        index: usize,
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("internal failure: {0}")]
    Internal(String),
}

/// Result of one `compute_motion` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostResult {
    #[serde(flatten)]
    pub output: MotionOutput,
    /// Updated blob, when the host passed one in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persisted: Option<TransformSnapshot>,
}

/// Owns the cache tables for one host process.
#[derive(Debug, Default)]
pub struct MotionHost {
    cfg: HostConfig,
    tables: IndexMap<String, TimelineCache>,
}

fn arg<T: DeserializeOwned>(args: &[Value], index: usize, name: &'static str) -> Result<T, HostError> {
    let value = args.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| HostError::ArgumentShape { index, name, source })
}

fn optional_arg<T: DeserializeOwned>(
    args: &[Value],
    index: usize,
    name: &'static str,
) -> Result<Option<T>, HostError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => arg(args, index, name).map(Some),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during compute_motion".to_string()
    }
}

impl MotionHost {
    pub fn new(cfg: HostConfig) -> Self {
        Self {
            cfg,
            tables: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.cfg
    }

    /// Cache table for an effect name, if one has been created.
    pub fn table(&self, name: &str) -> Option<&TimelineCache> {
        self.tables.get(name)
    }

    /// Effect names in first-use order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Drop every table.
    pub fn reset(&mut self) {
        self.tables.clear();
    }

    /// Typed entry point; the cache table is picked by `ctx.name`.
    pub fn compute(
        &mut self,
        params: &MotionParams,
        ctx: &CallContext,
        input: &MotionInput,
        persisted: Option<&mut TransformSnapshot>,
    ) -> MotionOutput {
        let cache_cfg = self.cfg.cache;
        let cache = self
            .tables
            .entry(ctx.name.clone())
            .or_insert_with(|| TimelineCache::with_config(cache_cfg));
        Orchestrator::new(cache).compute(params, ctx, input, persisted)
    }

    /// JSON entry point. See the module docs for the argument layout.
    pub fn compute_motion(&mut self, args: &[Value]) -> Result<HostResult, HostError> {
        let result = self.compute_motion_inner(args);
        if let Err(err) = &result {
            warn!("compute_motion: {err}");
        }
        result
    }

    fn compute_motion_inner(&mut self, args: &[Value]) -> Result<HostResult, HostError> {
        if !(ARGS_MIN..=ARGS_MAX).contains(&args.len()) {
            return Err(HostError::ArgumentCount(args.len()));
        }

        let raw_params: RawParams = arg(args, 0, "params")?;
        let ctx: CallContext = arg::<RawContext>(args, 1, "context")?.into();
        let current: RawTransform = arg(args, 2, "current")?;
        let previous: Option<RawTransform> = optional_arg(args, 3, "previous")?;
        let adjustment: RawAdjustment = arg(args, 4, "adjustments")?;
        let mut persisted: Option<TransformSnapshot> = optional_arg(args, 5, "persisted")?;

        let params = MotionParams::from(&raw_params);
        let input = MotionInput::new(
            current.into(),
            previous.map(Into::into),
            adjustment.into_snapshot(ctx.frame),
        );

        let output = catch_unwind(AssertUnwindSafe(|| {
            self.compute(&params, &ctx, &input, persisted.as_mut())
        }))
        .map_err(|payload| HostError::Internal(panic_message(payload.as_ref())))?;

        Ok(HostResult { output, persisted })
    }
}

/// Crate version packed as `major * 1_000_000 + minor * 1_000 + patch`.
pub fn version() -> u32 {
    let part = |s: &str| s.parse::<u32>().unwrap_or(0);
    part(env!("CARGO_PKG_VERSION_MAJOR")) * 1_000_000
        + part(env!("CARGO_PKG_VERSION_MINOR")) * 1_000
        + part(env!("CARGO_PKG_VERSION_PATCH"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_packs_cargo_version() {
        // 0.2.0
        assert_eq!(version(), 2_000);
    }

    #[test]
    fn tables_are_created_per_name() {
        let mut host = MotionHost::default();
        let ctx = |name: &str| {
            json!({ "name": name, "w": 64, "h": 64, "id": 1, "idx": 0, "num": 1, "frame": 1, "range": 4 })
        };
        for name in ["a", "b", "a"] {
            host.compute_motion(&[
                json!({ "geo_cache": 1 }),
                ctx(name),
                json!({}),
                Value::Null,
                json!({}),
            ])
            .unwrap();
        }
        assert_eq!(host.table_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(host.table("a").unwrap().has_family(trailblur_motion::FamilyId(1)));
    }
}
