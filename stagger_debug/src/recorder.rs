// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them
//! back as an iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_style_writes`](TraceSink::on_style_writes)) store only
//! the count.

use stagger_core::time::Instant;
use stagger_core::trace::{
    NotificationStateEvent, StyleWrite, TickEvent, TickSummary, TimerFireEvent, TraceSink,
    VisibilityChangeEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TICK: u8 = 1;
const TAG_VISIBILITY: u8 = 2;
const TAG_TIMER_FIRE: u8 = 3;
const TAG_NOTIFICATION: u8 = 4;
const TAG_TICK_SUMMARY: u8 = 5;
const TAG_STYLE_WRITES_COUNT: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }
}

impl TraceSink for RecorderSink {
    fn on_tick(&mut self, e: &TickEvent) {
        self.write_u8(TAG_TICK);
        self.write_u64(e.tick_index);
        self.write_u64(e.now.nanos());
    }

    fn on_visibility_change(&mut self, e: &VisibilityChangeEvent) {
        self.write_u8(TAG_VISIBILITY);
        self.write_u32(e.target_index);
        self.write_bool(e.visible);
        self.write_u64(e.at.nanos());
    }

    fn on_timer_fire(&mut self, e: &TimerFireEvent) {
        self.write_u8(TAG_TIMER_FIRE);
        self.write_u64(e.deadline.nanos());
        self.write_u64(e.at.nanos());
    }

    fn on_notification_state(&mut self, e: &NotificationStateEvent) {
        self.write_u8(TAG_NOTIFICATION);
        self.write_bool(e.visible);
        self.write_bool(e.suspended);
        self.write_u64(e.at.nanos());
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.write_u8(TAG_TICK_SUMMARY);
        self.write_u64(s.tick_index);
        self.write_u64(s.now.nanos());
        self.write_u32(s.timers_fired);
        self.write_u32(s.visibility_events);
        self.write_u32(s.style_writes);
    }

    fn on_style_writes(&mut self, tick_index: u64, writes: &[StyleWrite]) {
        self.write_u8(TAG_STYLE_WRITES_COUNT);
        self.write_u64(tick_index);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "style write count capped at u32::MAX for recording"
        )]
        self.write_u32(writes.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`TickEvent`].
    Tick(TickEvent),
    /// A [`VisibilityChangeEvent`].
    Visibility(VisibilityChangeEvent),
    /// A [`TimerFireEvent`].
    TimerFire(TimerFireEvent),
    /// A [`NotificationStateEvent`].
    Notification(NotificationStateEvent),
    /// A [`TickSummary`].
    TickSummary(TickSummary),
    /// Style-write count for a tick.
    StyleWritesCount {
        /// Tick counter.
        tick_index: u64,
        /// Number of style writes.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
#[must_use]
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn decode_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Tick(TickEvent {
            tick_index: self.read_u64()?,
            now: Instant(self.read_u64()?),
        }))
    }

    fn decode_visibility(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Visibility(VisibilityChangeEvent {
            target_index: self.read_u32()?,
            visible: self.read_bool()?,
            at: Instant(self.read_u64()?),
        }))
    }

    fn decode_timer_fire(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TimerFire(TimerFireEvent {
            deadline: Instant(self.read_u64()?),
            at: Instant(self.read_u64()?),
        }))
    }

    fn decode_notification(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Notification(NotificationStateEvent {
            visible: self.read_bool()?,
            suspended: self.read_bool()?,
            at: Instant(self.read_u64()?),
        }))
    }

    fn decode_tick_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickSummary(TickSummary {
            tick_index: self.read_u64()?,
            now: Instant(self.read_u64()?),
            timers_fired: self.read_u32()?,
            visibility_events: self.read_u32()?,
            style_writes: self.read_u32()?,
        }))
    }

    fn decode_style_writes_count(&mut self) -> Option<RecordedEvent> {
        let tick_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::StyleWritesCount { tick_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<RecordedEvent> {
        match self.read_u8()? {
            TAG_TICK => self.decode_tick(),
            TAG_VISIBILITY => self.decode_visibility(),
            TAG_TIMER_FIRE => self.decode_timer_fire(),
            TAG_NOTIFICATION => self.decode_notification(),
            TAG_TICK_SUMMARY => self.decode_tick_summary(),
            TAG_STYLE_WRITES_COUNT => self.decode_style_writes_count(),
            // Unknown tag: recording is corrupt, stop decoding.
            _ => None,
        }
    }
}
