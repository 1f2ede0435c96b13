// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport visibility observation.
//!
//! [`ViewportObserver`] turns raw geometry — the host's current viewport
//! rectangle and each target's layout bounds — into edge-triggered
//! [`VisibilityEvent`]s. It is the primitive every visibility-driven
//! behavior subscribes to: reveal groups trigger on their parent's first
//! entry, counters arm on their own.
//!
//! Observations are registered per target with [`ObserveOptions`]:
//!
//! - `once` (default): the observation detaches itself after the first
//!   `visible = true` event; no further events fire for that registration
//!   regardless of subsequent scrolling.
//! - `margin`: expands (positive) or shrinks (negative) the viewport before
//!   the intersection test, firing earlier or later than exact geometric
//!   entry. Entrance reveals use a negative margin so elements are well
//!   inside the viewport before animating.
//!
//! Registration is resource acquisition: callers release with
//! [`unobserve`](ViewportObserver::unobserve) on teardown. Observations
//! whose target has been destroyed are dropped automatically at the next
//! [`update`](ViewportObserver::update). A target that is never laid out
//! never fires — permanently pending, not an error.

use alloc::vec::Vec;

use core::fmt;

use kurbo::Rect;

use crate::target::{TargetId, TargetStore};

/// Options for a single observation registration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserveOptions {
    /// Detach after the first `visible = true` event.
    pub once: bool,
    /// Amount the viewport is inflated on each edge before the intersection
    /// test, in page units. Negative values shrink the trigger region.
    pub margin: f64,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            once: true,
            margin: 0.0,
        }
    }
}

impl ObserveOptions {
    /// Default options with the given margin.
    #[must_use]
    pub fn with_margin(margin: f64) -> Self {
        Self {
            margin,
            ..Self::default()
        }
    }
}

/// A handle to an observation registration.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId {
    idx: u32,
    generation: u32,
}

impl fmt::Debug for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObservationId({}@gen{})", self.idx, self.generation)
    }
}

/// An edge-triggered visibility change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    /// The registration that produced the event.
    pub observation: ObservationId,
    /// The observed target.
    pub target: TargetId,
    /// Whether the target is now inside the (margin-adjusted) viewport.
    pub visible: bool,
}

/// Watches registered targets for viewport entry and exit.
#[derive(Debug)]
pub struct ViewportObserver {
    target: Vec<TargetId>,
    once: Vec<bool>,
    margin: Vec<f64>,
    visible: Vec<bool>,
    fired_once: Vec<bool>,
    active: Vec<bool>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,
}

impl Default for ViewportObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportObserver {
    /// Creates an observer with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: Vec::new(),
            once: Vec::new(),
            margin: Vec::new(),
            visible: Vec::new(),
            fired_once: Vec::new(),
            active: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Registers an observation for `target`.
    pub fn observe(&mut self, target: TargetId, options: ObserveOptions) -> ObservationId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.target[idx as usize] = target;
            self.once[idx as usize] = options.once;
            self.margin[idx as usize] = options.margin;
            self.visible[idx as usize] = false;
            self.fired_once[idx as usize] = false;
            self.active[idx as usize] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.target.push(target);
            self.once.push(options.once);
            self.margin.push(options.margin);
            self.visible.push(false);
            self.fired_once.push(false);
            self.active.push(true);
            self.generation.push(0);
            idx
        };
        ObservationId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Releases an observation. Returns `true` if the handle referred to an
    /// active registration; stale handles return `false` (release is
    /// idempotent on every exit path).
    pub fn unobserve(&mut self, id: ObservationId) -> bool {
        if !self.is_active(id) {
            return false;
        }
        self.release(id.idx);
        true
    }

    /// Returns whether the handle refers to an active registration.
    #[must_use]
    pub fn is_active(&self, id: ObservationId) -> bool {
        (id.idx < self.len)
            && self.active[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of active registrations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Recomputes visibility for every active registration against the given
    /// viewport rectangle and appends edge events to `out`.
    ///
    /// Observations whose target has been destroyed are released here
    /// without emitting an event. `once` registrations detach immediately
    /// after their first `visible = true` event.
    pub fn update(&mut self, store: &TargetStore, viewport: Rect, out: &mut Vec<VisibilityEvent>) {
        for idx in 0..self.len {
            if !self.active[idx as usize] {
                continue;
            }
            let target = self.target[idx as usize];
            if !store.is_alive(target) {
                self.release(idx);
                continue;
            }

            let region = viewport.inflate(self.margin[idx as usize], self.margin[idx as usize]);
            let clipped = region.intersect(store.bounds(target));
            let now_visible = clipped.width() > 0.0 && clipped.height() > 0.0;

            if now_visible == self.visible[idx as usize] {
                continue;
            }
            self.visible[idx as usize] = now_visible;
            if now_visible {
                // Irreversible once set.
                self.fired_once[idx as usize] = true;
            }

            out.push(VisibilityEvent {
                observation: ObservationId {
                    idx,
                    generation: self.generation[idx as usize],
                },
                target,
                visible: now_visible,
            });

            if now_visible && self.once[idx as usize] {
                self.release(idx);
            }
        }
    }

    /// Releases every registration. Used on teardown.
    pub fn clear(&mut self) {
        for idx in 0..self.len {
            if self.active[idx as usize] {
                self.release(idx);
            }
        }
    }

    fn release(&mut self, idx: u32) {
        self.active[idx as usize] = false;
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }
}
