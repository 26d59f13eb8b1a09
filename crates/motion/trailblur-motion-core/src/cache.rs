//! Sparse per-entity timeline cache.
//!
//! Layout:
//! - families: `FamilyId -> Vec<SlotTimeline>` (dense, one entry per live slot)
//! - slot timeline: `block id -> [TransformSnapshot; BLOCK_LEN]`, created on
//!   first write so long, mostly-empty timelines stay small.
//!
//! Every operation is total. Unknown families, out-of-range slots and empty
//! positions read as absent and swallow writes; callers routinely address
//! positions that have not been populated yet in the current pass.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::ids::FamilyId;
use crate::modes::CacheMode;
use crate::snapshot::TransformSnapshot;

/// Frame positions per storage block.
pub const BLOCK_LEN: usize = 8;

/// Upper bound on live slots per family (the packed index width).
pub const MAX_SLOTS: usize = 1 << 18;

type Block = [TransformSnapshot; BLOCK_LEN];

#[inline]
fn locate(pos: u32) -> (u32, usize) {
    (pos / BLOCK_LEN as u32, pos as usize % BLOCK_LEN)
}

/// Cache behaviour toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Skip `overwrite` when the stored snapshot already has the same
    /// validity and frame tag.
    #[serde(default)]
    pub memoize_overwrite: bool,
}

/// Block-sparse history of one slot.
#[derive(Clone, Debug, Default)]
pub struct SlotTimeline {
    blocks: BTreeMap<u32, Block>,
}

impl SlotTimeline {
    /// Valid snapshot at `pos`, if any.
    pub fn get(&self, pos: u32) -> Option<&TransformSnapshot> {
        let (id, offset) = locate(pos);
        self.blocks
            .get(&id)
            .map(|block| &block[offset])
            .filter(|snap| snap.is_valid())
    }

    fn put(&mut self, pos: u32, snapshot: TransformSnapshot) {
        let (id, offset) = locate(pos);
        let block = self
            .blocks
            .entry(id)
            .or_insert_with(|| [TransformSnapshot::sentinel(); BLOCK_LEN]);
        block[offset] = snapshot;
    }

    /// Drop every block except the first (positions `0..BLOCK_LEN`). Only
    /// runs once the first block exists.
    fn retain_first_block(&mut self) {
        if self.blocks.len() > 1 && self.blocks.contains_key(&0) {
            self.blocks.retain(|id, _| *id == 0);
        }
    }

    /// Number of allocated blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of valid snapshots stored.
    pub fn len(&self) -> usize {
        self.blocks
            .values()
            .flat_map(|b| b.iter())
            .filter(|s| s.is_valid())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Populated positions in ascending order.
    pub fn positions(&self) -> Vec<u32> {
        self.blocks
            .iter()
            .flat_map(|(id, block)| {
                block
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.is_valid())
                    .map(move |(off, _)| id * BLOCK_LEN as u32 + off as u32)
            })
            .collect()
    }
}

/// History store keyed by `(family, slot, frame position)`.
///
/// Owned by whoever drives a render pass; it carries no global state.
#[derive(Clone, Debug, Default)]
pub struct TimelineCache {
    families: HashMap<FamilyId, Vec<SlotTimeline>>,
    cfg: CacheConfig,
}

impl TimelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: CacheConfig) -> Self {
        Self {
            families: HashMap::new(),
            cfg,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.cfg
    }

    /// Size the slot dimension of `family` to `slot_count`, clamped to
    /// `1..=MAX_SLOTS`.
    ///
    /// - `Disabled` drops the family instead.
    /// - Growing keeps existing slots; shrinking truncates from the end.
    /// - `Rolling` additionally compacts `slot` down to its first block, since
    ///   the rolling layout only ever addresses positions 0..=3.
    ///
    /// Calling this every frame with the same arguments is a no-op after the
    /// first call.
    pub fn resize(&mut self, family: FamilyId, slot: usize, slot_count: usize, mode: CacheMode) {
        if !mode.is_enabled() {
            self.clear_family(family);
            return;
        }

        let slots = self.families.entry(family).or_default();
        let target = slot_count.clamp(1, MAX_SLOTS);
        if slots.len() != target {
            debug!(
                "timeline cache: family {} slots {} -> {}",
                family.0,
                slots.len(),
                target
            );
            slots.resize_with(target, SlotTimeline::default);
        }

        if mode == CacheMode::Rolling {
            if let Some(timeline) = slots.get_mut(slot) {
                timeline.retain_first_block();
            }
        }
    }

    /// Insert or replace the snapshot at a position. Unknown family or slot is a no-op.
    pub fn write(&mut self, family: FamilyId, slot: usize, pos: u32, snapshot: TransformSnapshot) {
        match self.slot_mut(family, slot) {
            Some(timeline) => timeline.put(pos, snapshot),
            None => trace!(
                "timeline cache: dropped write family={} slot={} pos={}",
                family.0,
                slot,
                pos
            ),
        }
    }

    /// Same as [`write`](Self::write); used when reseeding values that later
    /// extrapolation reads. With `memoize_overwrite` enabled the write is
    /// skipped if the stored snapshot already carries the same tag.
    pub fn overwrite(
        &mut self,
        family: FamilyId,
        slot: usize,
        pos: u32,
        snapshot: TransformSnapshot,
    ) {
        let memoize = self.cfg.memoize_overwrite;
        if let Some(timeline) = self.slot_mut(family, slot) {
            if memoize && timeline.get(pos).is_some_and(|s| s.same_tag(&snapshot)) {
                return;
            }
            timeline.put(pos, snapshot);
        }
    }

    /// Valid snapshot at a position, or `None` if anything along the path is missing.
    pub fn read(&self, family: FamilyId, slot: usize, pos: u32) -> Option<&TransformSnapshot> {
        let found = self
            .families
            .get(&family)
            .and_then(|slots| slots.get(slot))
            .and_then(|timeline| timeline.get(pos));
        if found.is_none() {
            trace!(
                "timeline cache: miss family={} slot={} pos={}",
                family.0,
                slot,
                pos
            );
        }
        found
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        if !self.families.is_empty() {
            debug!("timeline cache: cleared {} families", self.families.len());
        }
        self.families = HashMap::new();
    }

    /// Drop a single family.
    pub fn clear_family(&mut self, family: FamilyId) {
        if self.families.remove(&family).is_some() {
            debug!("timeline cache: dropped family {}", family.0);
        }
    }

    /// Drop every family whose `id & mask == matched`.
    pub fn clear_masked(&mut self, mask: u32, matched: u32) {
        let before = self.families.len();
        self.families.retain(|id, _| !id.matches(mask, matched));
        let dropped = before - self.families.len();
        if dropped > 0 {
            debug!(
                "timeline cache: dropped {} families matching {:#x}/{:#x}",
                dropped, matched, mask
            );
        }
    }

    pub fn has_family(&self, family: FamilyId) -> bool {
        self.families.contains_key(&family)
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Slot count of a family, `None` when the family is absent.
    pub fn slot_count(&self, family: FamilyId) -> Option<usize> {
        self.families.get(&family).map(Vec::len)
    }

    /// Read-only view of one slot's history.
    pub fn timeline(&self, family: FamilyId, slot: usize) -> Option<&SlotTimeline> {
        self.families.get(&family).and_then(|slots| slots.get(slot))
    }

    /// Valid snapshots stored for a slot (0 when absent).
    pub fn snapshot_count(&self, family: FamilyId, slot: usize) -> usize {
        self.timeline(family, slot).map_or(0, SlotTimeline::len)
    }

    fn slot_mut(&mut self, family: FamilyId, slot: usize) -> Option<&mut SlotTimeline> {
        self.families
            .get_mut(&family)
            .and_then(|slots| slots.get_mut(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec2;

    fn snap(frame: u32, x: f64) -> TransformSnapshot {
        TransformSnapshot::new(frame, Vec2::ZERO, Vec2::new(x, 0.0), 0.0, Vec2::ONE)
    }

    #[test]
    fn write_requires_sized_family() {
        let mut cache = TimelineCache::new();
        let fam = FamilyId(1);
        cache.write(fam, 0, 3, snap(3, 1.0));
        assert!(cache.read(fam, 0, 3).is_none());
        assert!(!cache.has_family(fam));

        cache.resize(fam, 0, 1, CacheMode::Full);
        cache.write(fam, 0, 3, snap(3, 1.0));
        assert_eq!(cache.read(fam, 0, 3), Some(&snap(3, 1.0)));
        // Out-of-range slot is silently ignored.
        cache.write(fam, 5, 3, snap(3, 2.0));
        assert!(cache.read(fam, 5, 3).is_none());
    }

    #[test]
    fn invalid_snapshot_reads_as_absent() {
        let mut cache = TimelineCache::new();
        let fam = FamilyId(2);
        cache.resize(fam, 0, 1, CacheMode::Full);
        cache.write(fam, 0, 0, TransformSnapshot::sentinel());
        assert!(cache.read(fam, 0, 0).is_none());
        assert_eq!(cache.snapshot_count(fam, 0), 0);
    }

    #[test]
    fn blocks_allocate_sparsely() {
        let mut cache = TimelineCache::new();
        let fam = FamilyId(3);
        cache.resize(fam, 0, 1, CacheMode::Full);
        cache.write(fam, 0, 1, snap(1, 0.0));
        cache.write(fam, 0, 100, snap(100, 0.0));
        let tl = cache.timeline(fam, 0).unwrap();
        assert_eq!(tl.block_count(), 2);
        assert_eq!(tl.positions(), vec![1, 100]);
    }

    #[test]
    fn rolling_resize_keeps_only_first_block() {
        let mut cache = TimelineCache::new();
        let fam = FamilyId(4);
        cache.resize(fam, 0, 1, CacheMode::Full);
        cache.write(fam, 0, 1, snap(0, 1.0));
        cache.write(fam, 0, 20, snap(19, 2.0));
        cache.resize(fam, 0, 1, CacheMode::Rolling);
        assert_eq!(cache.timeline(fam, 0).unwrap().positions(), vec![1]);
        // Idempotent.
        cache.resize(fam, 0, 1, CacheMode::Rolling);
        assert_eq!(cache.read(fam, 0, 1), Some(&snap(0, 1.0)));
    }

    #[test]
    fn rolling_resize_without_first_block_keeps_history() {
        let mut cache = TimelineCache::new();
        let fam = FamilyId(6);
        cache.resize(fam, 0, 1, CacheMode::Full);
        cache.write(fam, 0, 20, snap(19, 2.0));
        cache.write(fam, 0, 40, snap(39, 3.0));
        cache.resize(fam, 0, 1, CacheMode::Rolling);
        assert_eq!(cache.timeline(fam, 0).unwrap().positions(), vec![20, 40]);

        cache.write(fam, 0, 1, snap(0, 1.0));
        cache.resize(fam, 0, 1, CacheMode::Rolling);
        assert_eq!(cache.timeline(fam, 0).unwrap().positions(), vec![1]);
    }

    #[test]
    fn slot_count_is_capped() {
        let mut cache = TimelineCache::new();
        let fam = FamilyId(7);
        cache.resize(fam, 0, usize::MAX, CacheMode::Full);
        assert_eq!(cache.slot_count(fam), Some(MAX_SLOTS));
        cache.resize(fam, 0, 0, CacheMode::Full);
        assert_eq!(cache.slot_count(fam), Some(1));
    }

    #[test]
    fn memoized_overwrite_skips_same_tag() {
        let mut cache = TimelineCache::with_config(CacheConfig {
            memoize_overwrite: true,
        });
        let fam = FamilyId(5);
        cache.resize(fam, 0, 1, CacheMode::Full);
        cache.overwrite(fam, 0, 2, snap(1, 1.0));
        cache.overwrite(fam, 0, 2, snap(1, 9.0));
        assert_eq!(cache.read(fam, 0, 2).unwrap().origin_offset.x, 1.0);
        cache.overwrite(fam, 0, 2, snap(2, 9.0));
        assert_eq!(cache.read(fam, 0, 2).unwrap().origin_offset.x, 9.0);
    }
}
