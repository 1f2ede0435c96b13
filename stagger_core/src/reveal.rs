// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered entrance reveals.
//!
//! A [`RevealGroup`] is an ordered set of items under a parent target. When
//! the parent first enters the viewport (reported through
//! [`VisibilityEvent`]s from an observer registered `once`), the
//! [`RevealSequencer`] schedules one start timer per item at
//!
//! ```text
//! trigger + base_delay + i · stagger_step
//! ```
//!
//! where `i` is the item's position. Insertion order is the stagger order;
//! items never reorder, and start times are non-decreasing in position.
//!
//! Triggering is latched: once the parent has been seen, later visibility
//! loss cancels nothing — scheduled items still start and running
//! transitions run to completion. The only cancellation path is
//! [`detach`](RevealSequencer::detach), which releases the group's pending
//! start timers and stops advancing its transitions (teardown).
//!
//! Each item transitions one-way from the group's [`HiddenStyle`] to the
//! fixed shown style (full opacity, zero offset) under the group's
//! [`TransitionProfile`]. A shown item never reverts.

use alloc::vec::Vec;

use kurbo::Vec2;

use crate::easing::{Easing, Spring};
use crate::target::{TargetId, TargetStore};
use crate::time::{Duration, Instant};
use crate::timer::{TimerFire, TimerId, TimerQueue};
use crate::viewport::VisibilityEvent;

/// Default stagger step between sibling reveals.
pub const DEFAULT_STAGGER_STEP: Duration = Duration::from_millis(100);

/// How a reveal item animates from hidden to shown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionProfile {
    /// Physical spring response; finishes when the spring settles.
    Spring(Spring),
    /// Fixed-duration eased transition, optionally delayed past the item's
    /// scheduled start.
    Timed {
        /// Extra delay before motion begins.
        delay: Duration,
        /// Length of the eased motion.
        duration: Duration,
        /// Curve applied over the duration.
        easing: Easing,
    },
}

impl Default for TransitionProfile {
    fn default() -> Self {
        Self::Spring(Spring::entrance())
    }
}

impl TransitionProfile {
    /// Samples progress at `elapsed` since the transition started. Returns
    /// the progress fraction and whether the transition has finished (in
    /// which case the fraction is exactly 1).
    fn sample(&self, elapsed: Duration) -> (f64, bool) {
        match *self {
            Self::Spring(spring) => {
                let t = elapsed.as_secs_f64();
                if spring.settled(t) {
                    (1.0, true)
                } else {
                    (spring.sample(t), false)
                }
            }
            Self::Timed {
                delay,
                duration,
                easing,
            } => {
                if elapsed < delay {
                    return (0.0, false);
                }
                if duration == Duration::ZERO {
                    return (1.0, true);
                }
                let t = (elapsed - delay).as_secs_f64() / duration.as_secs_f64();
                if t >= 1.0 {
                    (1.0, true)
                } else {
                    (easing.eval(t), false)
                }
            }
        }
    }
}

/// The style a reveal item starts from. The shown style is always full
/// opacity at zero offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HiddenStyle {
    /// Starting opacity.
    pub opacity: f64,
    /// Starting translation from the layout position.
    pub offset: Vec2,
}

impl Default for HiddenStyle {
    fn default() -> Self {
        // Faded out, shifted 20 page units down.
        Self {
            opacity: 0.0,
            offset: Vec2::new(0.0, 20.0),
        }
    }
}

impl HiddenStyle {
    /// A slide-in from the left, used by heading eyebrows.
    #[must_use]
    pub fn slide_from_left(distance: f64) -> Self {
        Self {
            opacity: 0.0,
            offset: Vec2::new(-distance, 0.0),
        }
    }
}

/// Configuration for one group of staggered reveals.
#[derive(Clone, Debug)]
pub struct RevealGroup {
    /// The target whose viewport entry triggers the group.
    pub parent: TargetId,
    /// Items in stagger order.
    pub items: Vec<TargetId>,
    /// Delay from trigger to the first item's start.
    pub base_delay: Duration,
    /// Increment between consecutive item starts.
    pub stagger_step: Duration,
    /// Transition shared by every item in the group.
    pub profile: TransitionProfile,
    /// Style items hold until their transition starts.
    pub hidden: HiddenStyle,
}

impl RevealGroup {
    /// Creates a group with the default timing and profile.
    #[must_use]
    pub fn new(parent: TargetId, items: Vec<TargetId>) -> Self {
        Self {
            parent,
            items,
            base_delay: Duration::ZERO,
            stagger_step: DEFAULT_STAGGER_STEP,
            profile: TransitionProfile::default(),
            hidden: HiddenStyle::default(),
        }
    }
}

/// A handle to an attached group.
///
/// Group slots are not recycled — pages attach a handful of groups for their
/// lifetime — so the handle is a plain index and detach tombstones the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ItemState {
    /// Waiting for the group to trigger.
    Pending,
    /// Start timer armed.
    Scheduled(TimerId),
    /// Transition running since the recorded instant.
    Animating(Instant),
    /// Terminal. Never reverts.
    Shown,
}

#[derive(Debug)]
struct GroupEntry {
    config: RevealGroup,
    state: Vec<ItemState>,
    triggered: bool,
    active: bool,
}

/// Plays staggered one-way reveals for attached groups.
#[derive(Debug, Default)]
pub struct RevealSequencer {
    groups: Vec<GroupEntry>,
}

impl RevealSequencer {
    /// Creates a sequencer with no groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a group and immediately applies its hidden style to every
    /// live item, so elements do not flash in their shown state before the
    /// trigger.
    pub fn attach(&mut self, group: RevealGroup, store: &mut TargetStore) -> GroupId {
        for &item in &group.items {
            if store.is_alive(item) {
                store.set_opacity(item, group.hidden.opacity);
                store.set_offset(item, group.hidden.offset);
            }
        }
        let state = alloc::vec![ItemState::Pending; group.items.len()];
        self.groups.push(GroupEntry {
            config: group,
            state,
            triggered: false,
            active: true,
        });
        #[expect(
            clippy::cast_possible_truncation,
            reason = "group count is bounded by attach calls, far below u32::MAX"
        )]
        let idx = (self.groups.len() - 1) as u32;
        GroupId(idx)
    }

    /// Routes a visibility event. When an attached, untriggered group's
    /// parent becomes visible, schedules every item's start timer. Returns
    /// whether any group triggered.
    ///
    /// Triggering is one-shot per group; later events for the same parent
    /// (including `visible = false` from a persistent observation) are
    /// ignored.
    pub fn on_visibility(
        &mut self,
        event: &VisibilityEvent,
        now: Instant,
        timers: &mut TimerQueue,
    ) -> bool {
        if !event.visible {
            return false;
        }
        let mut handled = false;
        for entry in &mut self.groups {
            if !entry.active || entry.triggered || entry.config.parent != event.target {
                continue;
            }
            entry.triggered = true;
            let mut due = now + entry.config.base_delay;
            for state in &mut entry.state {
                *state = ItemState::Scheduled(timers.schedule_at(due));
                due = due + entry.config.stagger_step;
            }
            handled = true;
        }
        handled
    }

    /// Routes a timer fire. If it is one of this sequencer's start timers,
    /// the item begins animating at `now` and `true` is returned.
    pub fn on_timer(&mut self, fire: &TimerFire, now: Instant) -> bool {
        for entry in &mut self.groups {
            if !entry.active {
                continue;
            }
            for state in &mut entry.state {
                if *state == ItemState::Scheduled(fire.id) {
                    *state = ItemState::Animating(now);
                    return true;
                }
            }
        }
        false
    }

    /// Steps every running transition to `now`, writing opacity and offset
    /// through the store. Items whose target has been destroyed are dropped
    /// without further writes. Finished items land exactly on the shown
    /// style.
    pub fn advance(&mut self, now: Instant, store: &mut TargetStore) {
        for entry in &mut self.groups {
            if !entry.active {
                continue;
            }
            for (state, &item) in entry.state.iter_mut().zip(&entry.config.items) {
                let ItemState::Animating(started_at) = *state else {
                    continue;
                };
                if !store.is_alive(item) {
                    *state = ItemState::Shown;
                    continue;
                }
                let (progress, done) = entry
                    .config
                    .profile
                    .sample(now.saturating_duration_since(started_at));
                if done {
                    store.set_opacity(item, 1.0);
                    store.set_offset(item, Vec2::ZERO);
                    *state = ItemState::Shown;
                } else {
                    let hidden = entry.config.hidden;
                    let opacity = hidden.opacity + (1.0 - hidden.opacity) * progress;
                    store.set_opacity(item, opacity.clamp(0.0, 1.0));
                    store.set_offset(item, hidden.offset * (1.0 - progress));
                }
            }
        }
    }

    /// Detaches a group: cancels its pending start timers and stops
    /// advancing its transitions. Returns `false` if the group was already
    /// detached.
    pub fn detach(&mut self, id: GroupId, timers: &mut TimerQueue) -> bool {
        let Some(entry) = self.groups.get_mut(id.0 as usize) else {
            return false;
        };
        if !entry.active {
            return false;
        }
        for state in &mut entry.state {
            if let ItemState::Scheduled(timer) = *state {
                let _ = timers.cancel(timer);
            }
        }
        entry.active = false;
        true
    }

    /// Returns whether the group is still attached.
    #[must_use]
    pub fn is_attached(&self, id: GroupId) -> bool {
        self.groups.get(id.0 as usize).is_some_and(|e| e.active)
    }

    /// Returns whether the group's parent has been seen.
    #[must_use]
    pub fn is_triggered(&self, id: GroupId) -> bool {
        self.groups.get(id.0 as usize).is_some_and(|e| e.triggered)
    }

    /// Returns how many of the group's items have reached the shown state.
    #[must_use]
    pub fn shown_count(&self, id: GroupId) -> usize {
        self.groups.get(id.0 as usize).map_or(0, |e| {
            e.state
                .iter()
                .filter(|s| matches!(s, ItemState::Shown))
                .count()
        })
    }

    /// Returns whether any item in any attached group is mid-transition, for
    /// hosts that want to idle when nothing moves.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.groups.iter().any(|e| {
            e.active
                && e.state
                    .iter()
                    .any(|s| matches!(s, ItemState::Animating(_)))
        })
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::viewport::{ObserveOptions, ViewportObserver};

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

    fn setup(n: usize) -> (TargetStore, TargetId, Vec<TargetId>) {
        let mut store = TargetStore::new();
        let parent = store.create_target();
        store.set_bounds(parent, Rect::new(0.0, 100.0, 800.0, 600.0));
        let items = (0..n)
            .map(|i| {
                let id = store.create_target();
                let top = 120.0 + 50.0 * i as f64;
                store.set_bounds(id, Rect::new(0.0, top, 800.0, top + 40.0));
                id
            })
            .collect();
        (store, parent, items)
    }

    fn visible_event(parent: TargetId) -> VisibilityEvent {
        // Synthesize the event the observer would deliver for `parent`.
        let mut observer = ViewportObserver::new();
        let observation = observer.observe(parent, ObserveOptions::default());
        VisibilityEvent {
            observation,
            target: parent,
            visible: true,
        }
    }

    #[test]
    fn attach_applies_hidden_style() {
        let (mut store, parent, items) = setup(3);
        let mut seq = RevealSequencer::new();
        let _group = seq.attach(RevealGroup::new(parent, items.clone()), &mut store);

        for &item in &items {
            assert_eq!(store.opacity(item), 0.0);
            assert_eq!(store.offset(item), Vec2::new(0.0, 20.0));
        }
    }

    #[test]
    fn items_schedule_at_staggered_deadlines() {
        let (mut store, parent, items) = setup(4);
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();

        let mut group = RevealGroup::new(parent, items);
        group.base_delay = Duration::from_millis(200);
        group.stagger_step = Duration::from_millis(100);
        let _id = seq.attach(group, &mut store);

        let trigger = Instant::from_millis(1_000);
        assert!(seq.on_visibility(&visible_event(parent), trigger, &mut timers));

        // Deadlines: 1200, 1300, 1400, 1500 — in position order.
        let mut fired = Vec::new();
        while let Some(fire) = timers.pop_due(Instant::from_millis(10_000)) {
            fired.push(fire.deadline.as_millis());
        }
        assert_eq!(fired, &[1_200, 1_300, 1_400, 1_500]);
    }

    #[test]
    fn start_times_never_precede_their_deadline() {
        let (mut store, parent, items) = setup(3);
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();
        let group = RevealGroup::new(parent, items);
        let base = group.base_delay;
        let step = group.stagger_step;
        let _id = seq.attach(group, &mut store);

        let trigger = Instant::from_millis(500);
        seq.on_visibility(&visible_event(parent), trigger, &mut timers);

        for i in 0..3_u64 {
            let earliest = trigger + base + step.saturating_mul(i);
            let fire = timers.pop_due(Instant::from_millis(60_000)).unwrap();
            assert!(fire.deadline >= earliest, "item {i} scheduled too early");
        }
    }

    #[test]
    fn transition_runs_to_exact_shown_state() {
        let (mut store, parent, items) = setup(1);
        let item = items[0];
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();
        let group_id = seq.attach(RevealGroup::new(parent, items), &mut store);

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        let fire = timers.pop_due(Instant::from_millis(100)).unwrap();
        assert!(seq.on_timer(&fire, Instant::ZERO));

        // Mid-flight: partially revealed, moving up.
        seq.advance(Instant::from_millis(120), &mut store);
        let mid_opacity = store.opacity(item);
        assert!(mid_opacity > 0.0 && mid_opacity < 1.0);
        assert!(store.offset(item).y < 20.0);

        // Well past the settle time: exact terminal style.
        seq.advance(Instant::from_millis(10_000), &mut store);
        assert_eq!(store.opacity(item), 1.0);
        assert_eq!(store.offset(item), Vec2::ZERO);
        assert_eq!(seq.shown_count(group_id), 1);
    }

    #[test]
    fn opacity_is_monotonic_under_entrance_spring() {
        let (mut store, parent, items) = setup(1);
        let item = items[0];
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();
        let _id = seq.attach(RevealGroup::new(parent, items), &mut store);

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        let fire = timers.pop_due(Instant::ZERO).unwrap();
        seq.on_timer(&fire, Instant::ZERO);

        let mut prev = 0.0;
        for ms in (0..2_000).step_by(16) {
            seq.advance(Instant::from_millis(ms), &mut store);
            let o = store.opacity(item);
            assert!(o >= prev - 1e-9, "opacity regressed at {ms}ms");
            prev = o;
        }
    }

    #[test]
    fn visibility_loss_after_trigger_cancels_nothing() {
        let (mut store, parent, items) = setup(2);
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();
        let group_id = seq.attach(RevealGroup::new(parent, items), &mut store);

        let mut leave = visible_event(parent);
        leave.visible = false;

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        let armed_before = timers.armed_count();

        // Parent scrolls back out before anything fires.
        assert!(!seq.on_visibility(&leave, Instant::from_millis(10), &mut timers));
        assert_eq!(timers.armed_count(), armed_before, "timers survive exit");

        // Items still start and finish.
        while let Some(fire) = timers.pop_due(Instant::from_millis(500)) {
            seq.on_timer(&fire, Instant::from_millis(500));
        }
        seq.advance(Instant::from_millis(20_000), &mut store);
        assert_eq!(seq.shown_count(group_id), 2);
    }

    #[test]
    fn group_triggers_at_most_once() {
        let (mut store, parent, items) = setup(2);
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();
        let _id = seq.attach(RevealGroup::new(parent, items), &mut store);

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        let armed = timers.armed_count();
        assert!(!seq.on_visibility(
            &visible_event(parent),
            Instant::from_millis(5),
            &mut timers
        ));
        assert_eq!(timers.armed_count(), armed, "no duplicate schedules");
    }

    #[test]
    fn detach_cancels_pending_starts() {
        let (mut store, parent, items) = setup(3);
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();
        let group_id = seq.attach(RevealGroup::new(parent, items), &mut store);

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        assert_eq!(timers.armed_count(), 3);

        assert!(seq.detach(group_id, &mut timers));
        assert_eq!(timers.armed_count(), 0, "pending starts released");
        assert!(!seq.is_attached(group_id));
        assert!(!seq.detach(group_id, &mut timers), "detach is idempotent");
    }

    #[test]
    fn destroyed_item_is_dropped_mid_transition() {
        let (mut store, parent, items) = setup(2);
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();
        let group_id = seq.attach(RevealGroup::new(parent, items.clone()), &mut store);

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        while let Some(fire) = timers.pop_due(Instant::from_millis(200)) {
            seq.on_timer(&fire, Instant::from_millis(200));
        }

        store.destroy_target(items[0]);
        // No panic, no write to the destroyed slot; the survivor completes.
        seq.advance(Instant::from_millis(20_000), &mut store);
        assert_eq!(store.opacity(items[1]), 1.0);
        assert_eq!(seq.shown_count(group_id), 2);
    }

    #[test]
    fn timed_profile_with_item_delay() {
        let (mut store, parent, items) = setup(1);
        let item = items[0];
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();

        let mut group = RevealGroup::new(parent, items);
        group.profile = TransitionProfile::Timed {
            delay: Duration::from_millis(100),
            duration: Duration::from_millis(700),
            easing: Easing::EMPHASIZED_OUT,
        };
        group.hidden = HiddenStyle {
            opacity: 0.0,
            offset: Vec2::new(0.0, 30.0),
        };
        let _id = seq.attach(group, &mut store);

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        let fire = timers.pop_due(Instant::ZERO).unwrap();
        seq.on_timer(&fire, Instant::ZERO);

        // Inside the profile delay: still hidden.
        seq.advance(Instant::from_millis(50), &mut store);
        assert_eq!(store.opacity(item), 0.0);

        // After delay + duration: exact shown state.
        seq.advance(Instant::from_millis(800), &mut store);
        assert_eq!(store.opacity(item), 1.0);
        assert_eq!(store.offset(item), Vec2::ZERO);
    }

    #[test]
    fn slide_from_left_interpolates_x() {
        let (mut store, parent, items) = setup(1);
        let item = items[0];
        let mut seq = RevealSequencer::new();
        let mut timers = TimerQueue::new();

        let mut group = RevealGroup::new(parent, items);
        group.hidden = HiddenStyle::slide_from_left(20.0);
        group.profile = TransitionProfile::Timed {
            delay: Duration::ZERO,
            duration: Duration::from_millis(600),
            easing: Easing::EaseOut,
        };
        let _id = seq.attach(group, &mut store);
        assert_eq!(store.offset(item), Vec2::new(-20.0, 0.0));

        seq.on_visibility(&visible_event(parent), Instant::ZERO, &mut timers);
        let fire = timers.pop_due(Instant::ZERO).unwrap();
        seq.on_timer(&fire, Instant::ZERO);

        seq.advance(Instant::from_millis(300), &mut store);
        let offset = store.offset(item);
        assert!(offset.x > -20.0 && offset.x < 0.0);
        assert_eq!(offset.y, 0.0);
    }
}
