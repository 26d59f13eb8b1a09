//! Mode switches selected by the host: cache layout, history extrapolation,
//! and end-of-pass retention.
//!
//! Hosts hand these over as small integers. `from_clamped` mirrors the host
//! contract (out-of-range values clamp to the nearest variant); the `TryFrom`
//! impls are strict for callers that want to reject bad input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snapshot::TransformSnapshot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("{kind} mode out of range: {value} (expected 0..={max})")]
    OutOfRange {
        kind: &'static str,
        value: i64,
        max: i64,
    },
}

/// How per-frame history is kept in the timeline cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// No history; the family is dropped on every resize.
    #[default]
    Disabled,
    /// Frame `f` is stored at position `f + 1` and read back at frame `f + 1`.
    Full,
    /// Position 1 holds the last rendered frame, positions 2 and 3 hold the
    /// seeds written on frames 1 and 2, position 0 the extrapolated value.
    Rolling,
}

/// Backward projection used to synthesise a "previous" snapshot on frame 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    #[default]
    None,
    Linear,
    Quadratic,
}

/// What happens to cached history once the last live slot of a frame is done.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep everything.
    #[default]
    Retain,
    /// Drop this family after the last frame of the range.
    PurgeAtRangeEnd,
    /// Drop every family.
    PurgeAll,
    /// Drop this family.
    PurgeFamily,
}

macro_rules! int_mode {
    ($ty:ident, $kind:literal, [$($idx:literal => $variant:ident),+ $(,)?]) => {
        impl $ty {
            const MAX: i64 = {
                let mut m = 0;
                $(if $idx > m { m = $idx; })+
                m
            };

            /// Convert a host integer, clamping into the valid range.
            pub fn from_clamped(value: i64) -> Self {
                match value.clamp(0, Self::MAX) {
                    $($idx => $ty::$variant,)+
                    _ => $ty::default(),
                }
            }

            /// Integer code understood by hosts.
            pub fn code(self) -> i64 {
                match self {
                    $($ty::$variant => $idx,)+
                }
            }
        }

        impl TryFrom<i64> for $ty {
            type Error = ModeError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                match value {
                    $($idx => Ok($ty::$variant),)+
                    _ => Err(ModeError::OutOfRange {
                        kind: $kind,
                        value,
                        max: Self::MAX,
                    }),
                }
            }
        }
    };
}

int_mode!(CacheMode, "cache", [0 => Disabled, 1 => Full, 2 => Rolling]);
int_mode!(Extrapolation, "extrapolation", [0 => None, 1 => Linear, 2 => Quadratic]);
int_mode!(
    RetentionPolicy,
    "retention",
    [0 => Retain, 1 => PurgeAtRangeEnd, 2 => PurgeAll, 3 => PurgeFamily]
);

impl CacheMode {
    #[inline]
    pub fn is_enabled(self) -> bool {
        !matches!(self, CacheMode::Disabled)
    }
}

impl Extrapolation {
    /// Number of seed snapshots needed beyond the current one.
    #[inline]
    pub fn order(self) -> usize {
        match self {
            Extrapolation::None => 0,
            Extrapolation::Linear => 1,
            Extrapolation::Quadratic => 2,
        }
    }

    #[inline]
    pub fn is_enabled(self) -> bool {
        self.order() > 0
    }

    /// Project backwards one frame from `current` and the seeds that follow it
    /// (`seeds[0]` is the next frame, `seeds[1]` the one after).
    ///
    /// Returns `None` when disabled or when fewer than `order()` seeds exist.
    /// The result keeps `current`'s frame tag and validity.
    pub fn project(
        self,
        current: &TransformSnapshot,
        seeds: &[TransformSnapshot],
    ) -> Option<TransformSnapshot> {
        match (self, seeds) {
            (Extrapolation::None, _) => None,
            (Extrapolation::Linear, [s1, ..]) => Some(*current * 2.0 - *s1),
            (Extrapolation::Quadratic, [s1, s2, ..]) => {
                Some(*current * 3.0 - *s1 * 3.0 + *s2)
            }
            _ => None,
        }
    }
}
