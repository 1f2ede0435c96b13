// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes [Chrome Trace
//! Event Format][spec] JSON to the given writer. Tooltip visibility windows
//! become duration (`B`/`E`) events, visibility edges and timer fires become
//! instant events, and tick summaries become counter tracks.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Timestamps are microseconds since mount.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut tooltip_up = false;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Tick(_) => {
                // Individual ticks are too chatty for a trace view; tick
                // summaries carry the useful counters.
            }
            RecordedEvent::Visibility(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": if e.visible { "Enter" } else { "Leave" },
                    "cat": "Viewport",
                    "ts": nanos_to_us(e.at.nanos()),
                    "pid": 0,
                    "tid": i64::from(e.target_index),
                    "s": "t",
                    "args": {
                        "target": e.target_index,
                    }
                }));
            }
            RecordedEvent::TimerFire(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "TimerFire",
                    "cat": "Timers",
                    "ts": nanos_to_us(e.at.nanos()),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "due_us": nanos_to_us(e.deadline.nanos()),
                        "late_us": nanos_to_us(e.at.nanos()) - nanos_to_us(e.deadline.nanos()),
                    }
                }));
            }
            RecordedEvent::Notification(e) => {
                if e.visible != tooltip_up {
                    tooltip_up = e.visible;
                    events.push(json!({
                        "ph": if e.visible { "B" } else { "E" },
                        "name": "TooltipVisible",
                        "cat": "Notification",
                        "ts": nanos_to_us(e.at.nanos()),
                        "pid": 0,
                        "tid": 1,
                        "args": {
                            "suspended": e.suspended,
                        }
                    }));
                } else {
                    // Suspension flip without a visibility change.
                    events.push(json!({
                        "ph": "i",
                        "name": if e.suspended { "Suspend" } else { "Resume" },
                        "cat": "Notification",
                        "ts": nanos_to_us(e.at.nanos()),
                        "pid": 0,
                        "tid": 1,
                        "s": "t",
                        "args": {}
                    }));
                }
            }
            RecordedEvent::TickSummary(s) => {
                events.push(json!({
                    "ph": "C",
                    "name": "LoopActivity",
                    "cat": "Summary",
                    "ts": nanos_to_us(s.now.nanos()),
                    "pid": 0,
                    "args": {
                        "timers_fired": s.timers_fired,
                        "visibility_events": s.visibility_events,
                        "style_writes": s.style_writes,
                    }
                }));
            }
            RecordedEvent::StyleWritesCount { tick_index, count } => {
                events.push(json!({
                    "ph": "C",
                    "name": "StyleWrites",
                    "cat": "Summary",
                    "ts": tick_index,
                    "pid": 0,
                    "args": {
                        "count": count,
                    }
                }));
            }
        }
    }

    // A dangling visible window at the end of the recording gets no close
    // event; leave it open, trace viewers render that as running to the end.

    let doc = Value::Array(events);
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writer.flush()
}

fn nanos_to_us(nanos: u64) -> f64 {
    nanos as f64 / 1_000.0
}

#[cfg(test)]
mod tests {
    use stagger_core::time::Instant;
    use stagger_core::trace::{
        NotificationStateEvent, TickSummary, TimerFireEvent, TraceSink,
    };

    use crate::recorder::RecorderSink;

    use super::*;

    #[test]
    fn export_produces_valid_json() {
        let mut recorder = RecorderSink::new();
        recorder.on_timer_fire(&TimerFireEvent {
            deadline: Instant::from_millis(2_000),
            at: Instant::from_millis(2_016),
        });
        recorder.on_notification_state(&NotificationStateEvent {
            visible: true,
            suspended: false,
            at: Instant::from_millis(2_016),
        });
        recorder.on_notification_state(&NotificationStateEvent {
            visible: false,
            suspended: false,
            at: Instant::from_millis(8_016),
        });
        recorder.on_tick_summary(&TickSummary {
            tick_index: 126,
            now: Instant::from_millis(2_016),
            timers_fired: 1,
            visibility_events: 0,
            style_writes: 1,
        });

        let mut out = Vec::new();
        export(recorder.as_bytes(), &mut out).unwrap();

        let doc: Value = serde_json::from_slice(&out).unwrap();
        let events = doc.as_array().unwrap();
        assert_eq!(events.len(), 4);

        // The tooltip window round-trips as a balanced B/E pair.
        let phases: Vec<&str> = events
            .iter()
            .filter(|e| e["name"] == "TooltipVisible")
            .map(|e| e["ph"].as_str().unwrap())
            .collect();
        assert_eq!(phases, &["B", "E"]);
    }

    #[test]
    fn duplicate_visible_state_becomes_suspension_marker() {
        let mut recorder = RecorderSink::new();
        recorder.on_notification_state(&NotificationStateEvent {
            visible: true,
            suspended: false,
            at: Instant::from_millis(2_000),
        });
        // Hover while already visible: same visible flag, new suspension.
        recorder.on_notification_state(&NotificationStateEvent {
            visible: true,
            suspended: true,
            at: Instant::from_millis(3_000),
        });

        let mut out = Vec::new();
        export(recorder.as_bytes(), &mut out).unwrap();
        let doc: Value = serde_json::from_slice(&out).unwrap();
        let names: Vec<&str> = doc
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, &["TooltipVisible", "Suspend"]);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc.as_array().unwrap().len(), 0);
    }
}
