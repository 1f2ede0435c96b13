// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic driving harness for the animation core.
//!
//! [`Stage`] owns one of everything — store, timer queue, observer,
//! sequencer, counters, optional notification scheduler — and runs the
//! canonical single-threaded tick loop from
//! [`stagger_core::host`]. Demos and integration tests feed it a scripted
//! clock and scroll position instead of a real display link, which makes
//! every run reproducible down to the tick.
//!
//! [`ScrollScript`] turns keyframed scroll offsets into per-tick viewport
//! rectangles. [`RecordingWriter`] captures every applied style write in
//! order, so tests can assert on the exact sequence a real host would have
//! painted. [`LatenessAudit`] aggregates how far behind their deadlines
//! timers actually fired under the chosen tick rate.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;

use stagger_core::counter::CounterAnimator;
use stagger_core::host::StyleWriter;
use stagger_core::notify::NotificationScheduler;
use stagger_core::reveal::RevealSequencer;
use stagger_core::target::{StyleChanges, TargetStore};
use stagger_core::time::{Duration, Instant};
use stagger_core::timer::TimerQueue;
use stagger_core::trace::{
    NotificationStateEvent, TickEvent, TickSummary, Tracer, TimerFireEvent, VisibilityChangeEvent,
};
use stagger_core::viewport::{ViewportObserver, VisibilityEvent};

// ---------------------------------------------------------------------------
// ScrollScript
// ---------------------------------------------------------------------------

/// A keyframed scroll timeline: the viewport's vertical offset as a step
/// function of time.
#[derive(Clone, Debug)]
pub struct ScrollScript {
    width: f64,
    height: f64,
    /// `(at, scroll_y)` keyframes in ascending time order.
    keyframes: Vec<(Instant, f64)>,
}

impl ScrollScript {
    /// Creates a script for a viewport of the given size, starting at the
    /// top of the page.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            keyframes: alloc::vec![(Instant::ZERO, 0.0)],
        }
    }

    /// Appends a keyframe: from `at` onward the page is scrolled to
    /// `scroll_y`.
    ///
    /// # Panics
    ///
    /// Panics if `at` precedes the last keyframe.
    pub fn scroll_to(&mut self, at: Instant, scroll_y: f64) {
        let last = self.keyframes.last().map_or(Instant::ZERO, |&(t, _)| t);
        assert!(at >= last, "scroll keyframes must be in time order");
        self.keyframes.push((at, scroll_y));
    }

    /// Returns the viewport rectangle in page coordinates at `now`.
    #[must_use]
    pub fn viewport_at(&self, now: Instant) -> Rect {
        let scroll_y = self
            .keyframes
            .iter()
            .rev()
            .find(|&&(t, _)| t <= now)
            .map_or(0.0, |&(_, y)| y);
        Rect::new(0.0, scroll_y, self.width, scroll_y + self.height)
    }
}

// ---------------------------------------------------------------------------
// RecordingWriter
// ---------------------------------------------------------------------------

/// One style write captured by [`RecordingWriter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppliedWrite {
    /// Opacity applied to a target.
    Opacity {
        /// Raw slot index.
        target: u32,
        /// Applied value.
        value: f64,
    },
    /// Translation offset applied to a target.
    Offset {
        /// Raw slot index.
        target: u32,
        /// Horizontal offset.
        x: f64,
        /// Vertical offset.
        y: f64,
    },
    /// Counter value applied to a target.
    Value {
        /// Raw slot index.
        target: u32,
        /// Applied value.
        value: u64,
    },
    /// Shown flag applied to a target.
    Shown {
        /// Raw slot index.
        target: u32,
        /// New flag value.
        shown: bool,
    },
}

impl AppliedWrite {
    /// Raw slot index of the written target.
    #[must_use]
    pub fn target(&self) -> u32 {
        match *self {
            Self::Opacity { target, .. }
            | Self::Offset { target, .. }
            | Self::Value { target, .. }
            | Self::Shown { target, .. } => target,
        }
    }
}

/// A [`StyleWriter`] that records every applied write, tagged with the
/// apply-call index it arrived in.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    /// `(apply_index, write)` in application order.
    pub writes: Vec<(u64, AppliedWrite)>,
    applies: u64,
}

impl RecordingWriter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the apply index of the first write matching `pred`, if any.
    pub fn first_matching(&self, mut pred: impl FnMut(&AppliedWrite) -> bool) -> Option<u64> {
        self.writes
            .iter()
            .find(|(_, w)| pred(w))
            .map(|&(tick, _)| tick)
    }

    /// Returns every write applied to the given slot, in order.
    #[must_use]
    pub fn writes_for(&self, target: u32) -> Vec<AppliedWrite> {
        self.writes
            .iter()
            .filter(|(_, w)| w.target() == target)
            .map(|&(_, w)| w)
            .collect()
    }

    /// Total number of recorded writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl StyleWriter for RecordingWriter {
    fn apply(&mut self, store: &TargetStore, changes: &StyleChanges) {
        let tick = self.applies;
        self.applies += 1;
        for &idx in &changes.opacities {
            self.writes.push((
                tick,
                AppliedWrite::Opacity {
                    target: idx,
                    value: store.opacity_at(idx),
                },
            ));
        }
        for &idx in &changes.offsets {
            let offset = store.offset_at(idx);
            self.writes.push((
                tick,
                AppliedWrite::Offset {
                    target: idx,
                    x: offset.x,
                    y: offset.y,
                },
            ));
        }
        for &idx in &changes.values {
            if let Some(value) = store.display_value_at(idx) {
                self.writes
                    .push((tick, AppliedWrite::Value { target: idx, value }));
            }
        }
        for &idx in &changes.shown {
            self.writes.push((
                tick,
                AppliedWrite::Shown {
                    target: idx,
                    shown: true,
                },
            ));
        }
        for &idx in &changes.hidden {
            self.writes.push((
                tick,
                AppliedWrite::Shown {
                    target: idx,
                    shown: false,
                },
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// LatenessAudit
// ---------------------------------------------------------------------------

/// Aggregates how late timers fire relative to their deadlines under the
/// host's tick granularity.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatenessAudit {
    max: Duration,
    total_nanos: u128,
    count: u64,
}

impl LatenessAudit {
    /// Creates an empty audit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one fire pumped at `at` for a timer due at `deadline`.
    pub fn observe(&mut self, deadline: Instant, at: Instant) {
        let late = at.saturating_duration_since(deadline);
        if late > self.max {
            self.max = late;
        }
        self.total_nanos += u128::from(late.nanos());
        self.count += 1;
    }

    /// Worst observed lateness.
    #[must_use]
    pub fn max_lateness(&self) -> Duration {
        self.max
    }

    /// Mean observed lateness, or zero with no observations.
    #[must_use]
    pub fn mean_lateness(&self) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "mean of u64 lateness values fits in u64"
        )]
        let mean = (self.total_nanos / u128::from(self.count)) as u64;
        Duration(mean)
    }

    /// Number of fires observed.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Owns the full component set and runs the canonical tick loop.
#[derive(Debug)]
pub struct Stage {
    /// Element registry.
    pub store: TargetStore,
    /// Shared timer queue.
    pub timers: TimerQueue,
    /// Visibility observer.
    pub observer: ViewportObserver,
    /// Reveal groups.
    pub sequencer: RevealSequencer,
    /// Count-up animations.
    pub counters: CounterAnimator,
    /// Notification tooltip scheduler, if mounted.
    pub notifier: Option<NotificationScheduler>,
    /// Lateness aggregation across all pumped fires.
    pub audit: LatenessAudit,
    changes: StyleChanges,
    events: Vec<VisibilityEvent>,
    tick_index: u64,
    last_notify_visible: bool,
    last_notify_suspended: bool,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Creates an empty stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: TargetStore::new(),
            timers: TimerQueue::new(),
            observer: ViewportObserver::new(),
            sequencer: RevealSequencer::new(),
            counters: CounterAnimator::new(),
            notifier: None,
            audit: LatenessAudit::new(),
            changes: StyleChanges::default(),
            events: Vec::new(),
            tick_index: 0,
            last_notify_visible: false,
            last_notify_suspended: false,
        }
    }

    /// Mounts a notification scheduler at `now`, replacing any previous one
    /// (the previous scheduler is unmounted first).
    pub fn mount_notifier(&mut self, mut scheduler: NotificationScheduler, now: Instant) {
        if let Some(mut old) = self.notifier.take() {
            old.unmount(&mut self.timers);
        }
        scheduler.mount(now, &mut self.timers, &mut self.store);
        self.last_notify_visible = scheduler.is_visible();
        self.last_notify_suspended = scheduler.is_suspended();
        self.notifier = Some(scheduler);
    }

    /// Runs one tick of the canonical loop: visibility, timers, animation,
    /// evaluation, application.
    pub fn tick(
        &mut self,
        now: Instant,
        viewport: Rect,
        writer: &mut dyn StyleWriter,
        tracer: &mut Tracer<'_>,
    ) {
        let tick_index = self.tick_index;
        self.tick_index += 1;
        tracer.tick(&TickEvent { tick_index, now });

        // 1. Visibility edges.
        self.events.clear();
        self.observer.update(&self.store, viewport, &mut self.events);
        for event in &self.events {
            tracer.visibility_change(&VisibilityChangeEvent::new(event, now));
            let _ = self.sequencer.on_visibility(event, now, &mut self.timers);
            let _ = self.counters.on_visibility(event, now);
        }

        // 2. Timer pump. Everything due this tick fires now, in deadline
        //    order; fires are routed to whichever component owns them.
        let mut timers_fired: u32 = 0;
        while let Some(fire) = self.timers.pop_due(now) {
            timers_fired += 1;
            self.audit.observe(fire.deadline, now);
            tracer.timer_fire(&TimerFireEvent {
                deadline: fire.deadline,
                at: now,
            });
            if self.sequencer.on_timer(&fire, now) {
                continue;
            }
            if let Some(notifier) = &mut self.notifier {
                let _ = notifier.on_timer(&fire, now, &mut self.timers, &mut self.store);
            }
        }

        // 3. Animation steps.
        self.sequencer.advance(now, &mut self.store);
        self.counters.advance(now, &mut self.store);

        // 4. Notification state edges for the trace stack.
        if let Some(notifier) = &self.notifier {
            let visible = notifier.is_visible();
            let suspended = notifier.is_suspended();
            if visible != self.last_notify_visible || suspended != self.last_notify_suspended {
                self.last_notify_visible = visible;
                self.last_notify_suspended = suspended;
                tracer.notification_state(&NotificationStateEvent {
                    visible,
                    suspended,
                    at: now,
                });
            }
        }

        // 5. Evaluate and apply.
        self.store.evaluate_into(&mut self.changes);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "per-tick event counts are small"
        )]
        tracer.tick_summary(&TickSummary {
            tick_index,
            now,
            timers_fired,
            visibility_events: self.events.len() as u32,
            style_writes: self.changes.write_count() as u32,
        });
        writer.apply(&self.store, &self.changes);
    }

    /// Forwards a pointer-enter on the notification anchor.
    pub fn pointer_enter(&mut self) {
        if let Some(notifier) = &mut self.notifier {
            notifier.pointer_enter(&mut self.store);
        }
    }

    /// Forwards a pointer-leave on the notification anchor.
    pub fn pointer_leave(&mut self) {
        if let Some(notifier) = &mut self.notifier {
            notifier.pointer_leave();
        }
    }

    /// Dismisses the notification tooltip, if mounted.
    pub fn dismiss_notification(&mut self) {
        if let Some(notifier) = &mut self.notifier {
            notifier.dismiss(&mut self.timers, &mut self.store);
        }
    }

    /// Releases every registration and timer: unmounts the notifier, clears
    /// observations, and drains the timer queue. No timer-driven activity
    /// survives teardown; transitions that already started still settle,
    /// since reveals complete once started.
    pub fn teardown(&mut self) {
        if let Some(mut notifier) = self.notifier.take() {
            notifier.unmount(&mut self.timers);
        }
        self.observer.clear();
        self.timers.clear();
        debug_assert_eq!(self.timers.armed_count(), 0);
    }

    /// Number of ticks run so far.
    #[must_use]
    pub fn ticks_run(&self) -> u64 {
        self.tick_index
    }
}
