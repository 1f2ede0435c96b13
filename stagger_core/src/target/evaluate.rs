// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change drain and style application set.
//!
//! Each tick, after animations have written styles, the host calls
//! [`TargetStore::evaluate`] to drain every dirty channel into
//! [`StyleChanges`] and applies the result through its
//! [`StyleWriter`](crate::host::StyleWriter). Channels are drained with
//! deterministic ordering so repeated runs of the same script produce the
//! same change lists.
//!
//! [`StyleChanges`] uses raw slot indices (`u32`) rather than [`TargetId`]
//! handles so hosts can index directly into the store's arrays via the
//! `*_at()` accessors (e.g.
//! [`opacity_at`](super::TargetStore::opacity_at)) without generation
//! checks on every access.
//!
//! [`TargetId`]: super::TargetId

use alloc::vec::Vec;

use super::store::TargetStore;
use crate::dirty;

/// The set of changes produced by a single [`TargetStore::evaluate`] call.
///
/// Each field contains the raw slot indices of targets that changed in the
/// corresponding category.
#[derive(Clone, Debug, Default)]
pub struct StyleChanges {
    /// Targets whose layout bounds changed.
    pub bounds: Vec<u32>,
    /// Targets whose opacity changed.
    pub opacities: Vec<u32>,
    /// Targets whose translation offset changed.
    pub offsets: Vec<u32>,
    /// Targets whose displayed counter value changed.
    pub values: Vec<u32>,
    /// Targets that transitioned from hidden to shown.
    pub shown: Vec<u32>,
    /// Targets that transitioned from shown to hidden.
    pub hidden: Vec<u32>,
    /// Targets added since the last evaluate.
    pub added: Vec<u32>,
    /// Targets removed since the last evaluate.
    pub removed: Vec<u32>,
}

impl StyleChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.bounds.clear();
        self.opacities.clear();
        self.offsets.clear();
        self.values.clear();
        self.shown.clear();
        self.hidden.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Returns whether no changes were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
            && self.opacities.is_empty()
            && self.offsets.is_empty()
            && self.values.is_empty()
            && self.shown.is_empty()
            && self.hidden.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }

    /// Total number of style writes recorded (excluding lifecycle lists).
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.bounds.len()
            + self.opacities.len()
            + self.offsets.len()
            + self.values.len()
            + self.shown.len()
            + self.hidden.len()
    }
}

impl TargetStore {
    /// Drains all dirty channels and returns the set of changes.
    pub fn evaluate(&mut self) -> StyleChanges {
        let mut changes = StyleChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided
    /// buffer to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut StyleChanges) {
        changes.clear();

        changes.bounds = self
            .dirty
            .drain(dirty::BOUNDS)
            .deterministic()
            .run()
            .collect();

        changes.opacities = self
            .dirty
            .drain(dirty::OPACITY)
            .deterministic()
            .run()
            .collect();

        changes.offsets = self
            .dirty
            .drain(dirty::OFFSET)
            .deterministic()
            .run()
            .collect();

        changes.values = self
            .dirty
            .drain(dirty::VALUE)
            .deterministic()
            .run()
            .collect();

        // SHOWN is edge-triggered at the setter, so the drained indices are
        // exactly the flips; route each by its current value.
        let flips: Vec<u32> = self
            .dirty
            .drain(dirty::SHOWN)
            .deterministic()
            .run()
            .collect();
        for idx in flips {
            if self.shown[idx as usize] {
                changes.shown.push(idx);
            } else {
                changes.hidden.push(idx);
            }
        }

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}
