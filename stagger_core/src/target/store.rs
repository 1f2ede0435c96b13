// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays target storage with allocation and property management.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{INVALID, TargetId};
use crate::dirty;

/// Struct-of-arrays storage for all animation targets.
///
/// Targets are addressed by [`TargetId`] handles. Internally, each target
/// occupies a slot in parallel arrays. Destroyed targets are recycled via a
/// free list, and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct TargetStore {
    // -- Geometry (set by the host) --
    pub(crate) bounds: Vec<Rect>,

    // -- Style outputs (written by animations) --
    pub(crate) opacity: Vec<f64>,
    pub(crate) offset: Vec<Vec2>,
    pub(crate) display_value: Vec<Option<u64>>,
    pub(crate) shown: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for TargetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetStore {
    /// Creates an empty target store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bounds: Vec::new(),
            opacity: Vec::new(),
            offset: Vec::new(),
            display_value: Vec::new(),
            shown: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new target and returns its handle.
    ///
    /// The target starts with zero bounds, full opacity, no offset, no
    /// display value, and the shown flag set.
    pub fn create_target(&mut self) -> TargetId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.bounds[idx as usize] = Rect::ZERO;
            self.opacity[idx as usize] = 1.0;
            self.offset[idx as usize] = Vec2::ZERO;
            self.display_value[idx as usize] = None;
            self.shown[idx as usize] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.bounds.push(Rect::ZERO);
            self.opacity.push(1.0);
            self.offset.push(Vec2::ZERO);
            self.display_value.push(None);
            self.shown.push(true);
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);

        TargetId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a target, freeing its slot for reuse.
    ///
    /// Observations and animations holding the handle see it go stale and
    /// drop their registration at the next tick; no further style is written
    /// to the slot.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_target(&mut self, id: TargetId) {
        self.validate(id);
        let idx = id.idx;

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }

    /// Returns whether the given handle refers to a live target.
    #[must_use]
    pub fn is_alive(&self, id: TargetId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live targets.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Property setters (mark dirty channels) --

    /// Sets the host-reported layout bounds, in page coordinates.
    pub fn set_bounds(&mut self, id: TargetId, bounds: Rect) {
        self.validate(id);
        self.bounds[id.idx as usize] = bounds;
        self.dirty.mark(id.idx, dirty::BOUNDS);
    }

    /// Sets the animated opacity (0–1).
    pub fn set_opacity(&mut self, id: TargetId, opacity: f64) {
        self.validate(id);
        self.opacity[id.idx as usize] = opacity;
        self.dirty.mark(id.idx, dirty::OPACITY);
    }

    /// Sets the animated translation offset from the layout position.
    pub fn set_offset(&mut self, id: TargetId, offset: Vec2) {
        self.validate(id);
        self.offset[id.idx as usize] = offset;
        self.dirty.mark(id.idx, dirty::OFFSET);
    }

    /// Sets the rendered counter value.
    pub fn set_display_value(&mut self, id: TargetId, value: u64) {
        self.validate(id);
        self.display_value[id.idx as usize] = Some(value);
        self.dirty.mark(id.idx, dirty::VALUE);
    }

    /// Sets the shown/hidden presentation flag. Marking is edge-triggered:
    /// setting the current value again produces no change event.
    pub fn set_shown(&mut self, id: TargetId, shown: bool) {
        self.validate(id);
        if self.shown[id.idx as usize] != shown {
            self.shown[id.idx as usize] = shown;
            self.dirty.mark(id.idx, dirty::SHOWN);
        }
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the layout bounds of a target.
    #[must_use]
    pub fn bounds(&self, id: TargetId) -> Rect {
        self.validate(id);
        self.bounds[id.idx as usize]
    }

    /// Returns the animated opacity of a target.
    #[must_use]
    pub fn opacity(&self, id: TargetId) -> f64 {
        self.validate(id);
        self.opacity[id.idx as usize]
    }

    /// Returns the animated offset of a target.
    #[must_use]
    pub fn offset(&self, id: TargetId) -> Vec2 {
        self.validate(id);
        self.offset[id.idx as usize]
    }

    /// Returns the rendered counter value of a target, if one has been
    /// written.
    #[must_use]
    pub fn display_value(&self, id: TargetId) -> Option<u64> {
        self.validate(id);
        self.display_value[id.idx as usize]
    }

    /// Returns the shown flag of a target.
    #[must_use]
    pub fn is_shown(&self, id: TargetId) -> bool {
        self.validate(id);
        self.shown[id.idx as usize]
    }

    // -- Raw accessors for change application --
    //
    // `StyleChanges` carries raw slot indices so hosts can apply updates
    // without paying for generation checks on every access.

    /// Returns the bounds at a raw slot index.
    #[must_use]
    pub fn bounds_at(&self, idx: u32) -> Rect {
        self.bounds[idx as usize]
    }

    /// Returns the opacity at a raw slot index.
    #[must_use]
    pub fn opacity_at(&self, idx: u32) -> f64 {
        self.opacity[idx as usize]
    }

    /// Returns the offset at a raw slot index.
    #[must_use]
    pub fn offset_at(&self, idx: u32) -> Vec2 {
        self.offset[idx as usize]
    }

    /// Returns the display value at a raw slot index.
    #[must_use]
    pub fn display_value_at(&self, idx: u32) -> Option<u64> {
        self.display_value[idx as usize]
    }

    /// Returns the shown flag at a raw slot index.
    #[must_use]
    pub fn is_shown_at(&self, idx: u32) -> bool {
        self.shown[idx as usize]
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: TargetId) {
        assert!(
            id.idx != INVALID && self.is_alive(id),
            "stale target handle: {id:?}"
        );
    }
}
