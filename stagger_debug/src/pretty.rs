// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).
//! Timestamps are printed as milliseconds since mount.

use std::io::Write;

use stagger_core::time::Instant;
use stagger_core::trace::{
    NotificationStateEvent, StyleWrite, TickSummary, TimerFireEvent, TraceSink,
    VisibilityChangeEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn ms(t: Instant) -> f64 {
    t.nanos() as f64 / 1_000_000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    // `on_tick` stays a no-op: quiet ticks dominate a real run, and the
    // summary line already carries the tick index for busy ones.

    fn on_visibility_change(&mut self, e: &VisibilityChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[visible] target={} {} at={:.1}ms",
            e.target_index,
            if e.visible { "entered" } else { "left" },
            ms(e.at),
        );
    }

    fn on_timer_fire(&mut self, e: &TimerFireEvent) {
        let _ = writeln!(
            self.writer,
            "[timer] due={:.1}ms fired={:.1}ms (+{:.1}ms)",
            ms(e.deadline),
            ms(e.at),
            ms(e.at) - ms(e.deadline),
        );
    }

    fn on_notification_state(&mut self, e: &NotificationStateEvent) {
        let _ = writeln!(
            self.writer,
            "[notify] visible={} suspended={} at={:.1}ms",
            e.visible,
            e.suspended,
            ms(e.at),
        );
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        // Quiet ticks produce no summary line.
        if s.timers_fired == 0 && s.visibility_events == 0 && s.style_writes == 0 {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[summary] tick={} timers={} events={} writes={}",
            s.tick_index, s.timers_fired, s.visibility_events, s.style_writes,
        );
    }

    fn on_style_writes(&mut self, tick_index: u64, writes: &[StyleWrite]) {
        let _ = writeln!(
            self.writer,
            "[writes] tick={} count={}",
            tick_index,
            writes.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use stagger_core::trace::TickEvent;

    use super::*;

    fn capture(f: impl FnOnce(&mut PrettyPrintSink<Vec<u8>>)) -> String {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        f(&mut sink);
        String::from_utf8(sink.writer).unwrap()
    }

    #[test]
    fn tick_events_are_silent() {
        let out = capture(|sink| {
            sink.on_tick(&TickEvent {
                tick_index: 3,
                now: Instant::from_millis(48),
            });
        });
        assert!(out.is_empty());
    }

    #[test]
    fn visibility_line_format() {
        let out = capture(|sink| {
            sink.on_visibility_change(&VisibilityChangeEvent {
                target_index: 7,
                visible: true,
                at: Instant::from_millis(32),
            });
            sink.on_visibility_change(&VisibilityChangeEvent {
                target_index: 7,
                visible: false,
                at: Instant::from_millis(48),
            });
        });
        assert_eq!(
            out,
            "[visible] target=7 entered at=32.0ms\n[visible] target=7 left at=48.0ms\n"
        );
    }

    #[test]
    fn timer_line_shows_lateness() {
        let out = capture(|sink| {
            sink.on_timer_fire(&TimerFireEvent {
                deadline: Instant::from_millis(2_000),
                at: Instant::from_millis(2_012),
            });
        });
        assert_eq!(out, "[timer] due=2000.0ms fired=2012.0ms (+12.0ms)\n");
    }

    #[test]
    fn quiet_summary_is_suppressed() {
        let out = capture(|sink| {
            sink.on_tick_summary(&TickSummary {
                tick_index: 1,
                now: Instant::from_millis(16),
                timers_fired: 0,
                visibility_events: 0,
                style_writes: 0,
            });
        });
        assert!(out.is_empty());
    }

    #[test]
    fn busy_summary_is_printed() {
        let out = capture(|sink| {
            sink.on_tick_summary(&TickSummary {
                tick_index: 125,
                now: Instant::from_millis(2_000),
                timers_fired: 1,
                visibility_events: 0,
                style_writes: 2,
            });
        });
        assert_eq!(out, "[summary] tick=125 timers=1 events=0 writes=2\n");
    }
}
