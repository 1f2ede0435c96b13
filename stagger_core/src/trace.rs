// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the animation loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! loop instrumentation calls at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates per-target [`StyleWrite`]
//!   records and the corresponding `TraceSink` method.

use crate::time::Instant;
use crate::viewport::VisibilityEvent;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the host delivers an animation tick.
#[derive(Clone, Copy, Debug)]
pub struct TickEvent {
    /// Monotonic tick counter.
    pub tick_index: u64,
    /// Host time of the tick.
    pub now: Instant,
}

/// Emitted for each visibility edge the observer reports.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityChangeEvent {
    /// Raw slot index of the target.
    pub target_index: u32,
    /// Whether the target entered (`true`) or left the trigger region.
    pub visible: bool,
    /// Host time of the tick that detected the edge.
    pub at: Instant,
}

impl VisibilityChangeEvent {
    /// Creates a trace record for an observer event detected at `at`.
    #[must_use]
    pub fn new(event: &VisibilityEvent, at: Instant) -> Self {
        Self {
            target_index: event.target.index(),
            visible: event.visible,
            at,
        }
    }
}

/// Emitted for each due timer the loop pumps.
#[derive(Clone, Copy, Debug)]
pub struct TimerFireEvent {
    /// The deadline the timer was armed for.
    pub deadline: Instant,
    /// The pump time (at or after the deadline).
    pub at: Instant,
}

/// Emitted when the notification scheduler changes presentation state.
#[derive(Clone, Copy, Debug)]
pub struct NotificationStateEvent {
    /// Whether the tooltip is now up.
    pub visible: bool,
    /// Whether the anchor is hovered.
    pub suspended: bool,
    /// Host time of the change.
    pub at: Instant,
}

/// Per-tick summary of loop activity.
#[derive(Clone, Copy, Debug)]
pub struct TickSummary {
    /// Tick counter.
    pub tick_index: u64,
    /// Host time of the tick.
    pub now: Instant,
    /// Due timers pumped this tick.
    pub timers_fired: u32,
    /// Visibility edges reported this tick.
    pub visibility_events: u32,
    /// Style writes drained from the store this tick.
    pub style_writes: u32,
}

/// Which style field a write touched.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleField {
    /// Layout bounds (host geometry feed).
    Bounds,
    /// Animated opacity.
    Opacity,
    /// Animated translation offset.
    Offset,
    /// Displayed counter value.
    Value,
    /// Shown/hidden flag.
    Shown,
}

/// A per-tick style write record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct StyleWrite {
    /// Raw slot index of the written target.
    pub target_index: u32,
    /// Which field was written.
    pub field: StyleField,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the animation loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a host tick is received.
    fn on_tick(&mut self, e: &TickEvent) {
        _ = e;
    }

    /// Called for each visibility edge.
    fn on_visibility_change(&mut self, e: &VisibilityChangeEvent) {
        _ = e;
    }

    /// Called for each pumped timer fire.
    fn on_timer_fire(&mut self, e: &TimerFireEvent) {
        _ = e;
    }

    /// Called when the notification tooltip shows, hides, or changes
    /// suspension.
    fn on_notification_state(&mut self, e: &NotificationStateEvent) {
        _ = e;
    }

    /// Called with a per-tick activity summary.
    fn on_tick_summary(&mut self, s: &TickSummary) {
        _ = s;
    }

    /// Called with per-tick style writes (requires the `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_style_writes(&mut self, tick_index: u64, writes: &[StyleWrite]) {
        _ = (tick_index, writes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, e: &TickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VisibilityChangeEvent`].
    #[inline]
    pub fn visibility_change(&mut self, e: &VisibilityChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visibility_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TimerFireEvent`].
    #[inline]
    pub fn timer_fire(&mut self, e: &TimerFireEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_timer_fire(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NotificationStateEvent`].
    #[inline]
    pub fn notification_state(&mut self, e: &NotificationStateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_notification_state(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickSummary`].
    #[inline]
    pub fn tick_summary(&mut self, s: &TickSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_tick_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits style writes (requires the `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn style_writes(&mut self, tick_index: u64, writes: &[StyleWrite]) {
        if let Some(s) = &mut self.sink {
            s.on_style_writes(tick_index, writes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick() -> TickEvent {
        TickEvent {
            tick_index: 7,
            now: Instant::from_millis(116),
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_tick(&sample_tick());
        sink.on_visibility_change(&VisibilityChangeEvent {
            target_index: 3,
            visible: true,
            at: Instant::from_millis(116),
        });
        sink.on_tick_summary(&TickSummary {
            tick_index: 7,
            now: Instant::from_millis(116),
            timers_fired: 0,
            visibility_events: 1,
            style_writes: 2,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.tick(&sample_tick());
        tracer.timer_fire(&TimerFireEvent {
            deadline: Instant::from_millis(100),
            at: Instant::from_millis(116),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            ticks: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_tick(&mut self, e: &TickEvent) {
                self.ticks.push(e.tick_index);
            }
        }

        let mut sink = RecordingSink { ticks: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.tick(&sample_tick());
        drop(tracer);
        assert_eq!(sink.ticks, &[7]);
    }
}
