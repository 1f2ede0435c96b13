// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eased integer count-up animation.
//!
//! A counter interpolates its target's displayed value from 0 to a final
//! integer over a fixed duration, driven by the first visibility event for
//! its target (observed `once`). Interpolation happens in floating point and
//! is rounded to the nearest integer for display; the written sequence is
//! monotonically non-decreasing and the last write is exactly the target
//! value.
//!
//! A counter starts at most once per element instance. If the element is
//! destroyed mid-animation the counter stops cleanly at the next
//! [`advance`](CounterAnimator::advance) — stale handles are never written
//! through.

use alloc::vec::Vec;

use crate::easing::Easing;
use crate::target::{TargetId, TargetStore};
use crate::time::{Duration, Instant};
use crate::viewport::VisibilityEvent;

/// Default count-up duration.
pub const DEFAULT_COUNT_DURATION: Duration = Duration::from_secs(2);

/// Configuration for one count-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterConfig {
    /// Final displayed value.
    pub target_value: u64,
    /// Length of the count-up.
    pub duration: Duration,
    /// Curve applied over the duration.
    pub easing: Easing,
}

impl CounterConfig {
    /// Creates a config with the default duration and ease-out curve.
    #[must_use]
    pub const fn new(target_value: u64) -> Self {
        Self {
            target_value,
            duration: DEFAULT_COUNT_DURATION,
            easing: Easing::EaseOut,
        }
    }
}

#[derive(Debug)]
struct CounterEntry {
    target: TargetId,
    config: CounterConfig,
    started_at: Option<Instant>,
    last_display: u64,
    done: bool,
}

/// Runs count-up animations for registered targets.
#[derive(Debug, Default)]
pub struct CounterAnimator {
    entries: Vec<CounterEntry>,
}

impl CounterAnimator {
    /// Creates an animator with no counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a count-up for `target`. The animation stays dormant until
    /// a visibility event for the target arrives.
    pub fn attach(&mut self, target: TargetId, config: CounterConfig) {
        self.entries.push(CounterEntry {
            target,
            config,
            started_at: None,
            last_display: 0,
            done: false,
        });
    }

    /// Routes a visibility event. The first `visible = true` for a
    /// registered target starts its count-up; anything after that is
    /// ignored (one start per element lifetime). Returns whether a counter
    /// started.
    pub fn on_visibility(&mut self, event: &VisibilityEvent, now: Instant) -> bool {
        if !event.visible {
            return false;
        }
        let mut started = false;
        for entry in &mut self.entries {
            if entry.target == event.target && entry.started_at.is_none() && !entry.done {
                entry.started_at = Some(now);
                started = true;
            }
        }
        started
    }

    /// Steps every running counter to `now`, writing display values through
    /// the store. Counters whose target has been destroyed are dropped
    /// without further writes.
    pub fn advance(&mut self, now: Instant, store: &mut TargetStore) {
        for entry in &mut self.entries {
            let Some(started_at) = entry.started_at else {
                continue;
            };
            if entry.done {
                continue;
            }
            if !store.is_alive(entry.target) {
                entry.done = true;
                continue;
            }

            let elapsed = now.saturating_duration_since(started_at);
            let display = if elapsed >= entry.config.duration {
                entry.done = true;
                entry.config.target_value
            } else {
                let t = elapsed.as_secs_f64() / entry.config.duration.as_secs_f64();
                let interpolated = entry.config.easing.eval(t) * entry.config.target_value as f64;
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "eased fraction of a u64 target rounds back into range"
                )]
                let rounded = (interpolated + 0.5) as u64;
                // Clamp monotonic against float wobble.
                rounded.max(entry.last_display).min(entry.config.target_value)
            };

            entry.last_display = display;
            store.set_display_value(entry.target, display);
        }
    }

    /// Releases every counter registered for `target`. Returns whether any
    /// was removed.
    pub fn detach(&mut self, target: TargetId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.target != target);
        self.entries.len() != before
    }

    /// Returns whether any counter is still mid-count.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.started_at.is_some() && !e.done)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::viewport::{ObserveOptions, ViewportObserver};

    fn setup(value: u64) -> (TargetStore, TargetId, CounterAnimator) {
        let mut store = TargetStore::new();
        let target = store.create_target();
        store.set_bounds(target, Rect::new(0.0, 0.0, 100.0, 40.0));
        let mut counters = CounterAnimator::new();
        counters.attach(target, CounterConfig::new(value));
        (store, target, counters)
    }

    fn visible_event(target: TargetId) -> VisibilityEvent {
        let mut observer = ViewportObserver::new();
        let observation = observer.observe(target, ObserveOptions::default());
        VisibilityEvent {
            observation,
            target,
            visible: true,
        }
    }

    #[test]
    fn dormant_until_visible() {
        let (mut store, target, mut counters) = setup(120);
        counters.advance(Instant::from_millis(500), &mut store);
        assert_eq!(store.display_value(target), None, "no writes before start");
    }

    #[test]
    fn counts_up_monotonically_to_exact_target() {
        let (mut store, target, mut counters) = setup(98);
        counters.on_visibility(&visible_event(target), Instant::ZERO);

        let mut prev = 0;
        for ms in (0..2_500).step_by(16) {
            counters.advance(Instant::from_millis(ms), &mut store);
            let v = store.display_value(target).unwrap();
            assert!(v >= prev, "display regressed at {ms}ms: {v} < {prev}");
            assert!(v <= 98, "overshot target at {ms}ms");
            prev = v;
        }
        assert_eq!(store.display_value(target), Some(98));
    }

    #[test]
    fn first_write_near_zero() {
        let (mut store, target, mut counters) = setup(1_000);
        counters.on_visibility(&visible_event(target), Instant::ZERO);
        counters.advance(Instant::ZERO, &mut store);
        assert_eq!(store.display_value(target), Some(0));
    }

    #[test]
    fn zero_target_is_immediate() {
        let (mut store, target, mut counters) = setup(0);
        counters.on_visibility(&visible_event(target), Instant::ZERO);
        counters.advance(Instant::from_millis(16), &mut store);
        assert_eq!(store.display_value(target), Some(0));
        counters.advance(Instant::from_millis(3_000), &mut store);
        assert_eq!(store.display_value(target), Some(0));
    }

    #[test]
    fn starts_at_most_once() {
        let (mut store, target, mut counters) = setup(50);
        assert!(counters.on_visibility(&visible_event(target), Instant::ZERO));

        // A second visibility event must not restart the count.
        counters.advance(Instant::from_millis(3_000), &mut store);
        assert_eq!(store.display_value(target), Some(50));
        assert!(!counters.on_visibility(
            &visible_event(target),
            Instant::from_millis(3_000)
        ));
        counters.advance(Instant::from_millis(3_100), &mut store);
        assert_eq!(store.display_value(target), Some(50), "no restart from 0");
    }

    #[test]
    fn hidden_event_does_not_start() {
        let (mut store, target, mut counters) = setup(50);
        let mut event = visible_event(target);
        event.visible = false;
        assert!(!counters.on_visibility(&event, Instant::ZERO));
        counters.advance(Instant::from_millis(100), &mut store);
        assert_eq!(store.display_value(target), None);
    }

    #[test]
    fn destroyed_target_stops_cleanly() {
        let (mut store, target, mut counters) = setup(200);
        counters.on_visibility(&visible_event(target), Instant::ZERO);
        counters.advance(Instant::from_millis(500), &mut store);

        store.destroy_target(target);
        // Next tick drops the counter; no panic, no stale write.
        counters.advance(Instant::from_millis(1_000), &mut store);
        assert!(!counters.is_animating());
    }

    #[test]
    fn ends_exactly_at_duration_boundary() {
        let (mut store, target, mut counters) = setup(777);
        counters.on_visibility(&visible_event(target), Instant::ZERO);
        counters.advance(Instant::from_millis(2_000), &mut store);
        assert_eq!(store.display_value(target), Some(777));
        assert!(!counters.is_animating());
    }

    #[test]
    fn detach_releases_registration() {
        let (mut store, target, mut counters) = setup(10);
        assert!(counters.detach(target));
        assert!(!counters.detach(target), "second detach is a no-op");
        counters.on_visibility(&visible_event(target), Instant::ZERO);
        counters.advance(Instant::from_millis(1_000), &mut store);
        assert_eq!(store.display_value(target), None);
    }

    #[test]
    fn ease_out_front_loads_the_count() {
        let (mut store, target, mut counters) = setup(100);
        counters.on_visibility(&visible_event(target), Instant::ZERO);
        counters.advance(Instant::from_millis(1_000), &mut store);
        // Halfway through an ease-out count, well past half the value.
        let v = store.display_value(target).unwrap();
        assert!(v > 50, "ease-out midpoint was {v}");
    }
}
