// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated page run that exercises the animation loop and the tracing
//! pipeline.
//!
//! Builds a page with an above-the-fold hero (staggered reveal plus two
//! stat counters), a below-the-fold section with a heading reveal, and a
//! notification tooltip, then scripts 50 seconds of scrolling, hovering,
//! and dismissal. Events go to both a
//! [`PrettyPrintSink`](stagger_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](stagger_debug::recorder::RecorderSink); the recording
//! is exported as Chrome trace JSON at the end.

use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;

use stagger_core::counter::CounterConfig;
use stagger_core::easing::Easing;
use stagger_core::notify::{NotificationConfig, NotificationScheduler};
use stagger_core::reveal::{HiddenStyle, RevealGroup, TransitionProfile};
use stagger_core::target::TargetId;
use stagger_core::time::{Duration, Instant};
use stagger_core::trace::{
    NotificationStateEvent, StyleWrite, TickEvent, TickSummary, TimerFireEvent, TraceSink, Tracer,
    VisibilityChangeEvent,
};
use stagger_core::viewport::ObserveOptions;

use stagger_debug::pretty::PrettyPrintSink;
use stagger_debug::recorder::RecorderSink;

use stagger_harness::{RecordingWriter, ScrollScript, Stage};

/// Simulation tick granularity.
const TICK_MS: u64 = 100;
/// Total simulated wall-clock time.
const RUN_MS: u64 = 50_000;

/// Fans every trace event out to both the pretty printer and the recorder.
struct TeeSink {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for TeeSink {
    fn on_tick(&mut self, e: &TickEvent) {
        self.pretty.on_tick(e);
        self.recorder.on_tick(e);
    }

    fn on_visibility_change(&mut self, e: &VisibilityChangeEvent) {
        self.pretty.on_visibility_change(e);
        self.recorder.on_visibility_change(e);
    }

    fn on_timer_fire(&mut self, e: &TimerFireEvent) {
        self.pretty.on_timer_fire(e);
        self.recorder.on_timer_fire(e);
    }

    fn on_notification_state(&mut self, e: &NotificationStateEvent) {
        self.pretty.on_notification_state(e);
        self.recorder.on_notification_state(e);
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.pretty.on_tick_summary(s);
        self.recorder.on_tick_summary(s);
    }

    fn on_style_writes(&mut self, tick_index: u64, writes: &[StyleWrite]) {
        self.pretty.on_style_writes(tick_index, writes);
        self.recorder.on_style_writes(tick_index, writes);
    }
}

/// Lays out `count` stacked elements starting at `top`.
fn strip(stage: &mut Stage, top: f64, count: usize) -> Vec<TargetId> {
    (0..count)
        .map(|i| {
            let id = stage.store.create_target();
            let y = top + 110.0 * i as f64;
            stage.store.set_bounds(id, Rect::new(40.0, y, 1240.0, y + 90.0));
            id
        })
        .collect()
}

fn main() {
    let mut stage = Stage::new();
    let mut writer = RecordingWriter::new();
    let mut tee = TeeSink {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- hero: above the fold ----------------------------------------------
    let hero = stage.store.create_target();
    stage.store.set_bounds(hero, Rect::new(0.0, 0.0, 1280.0, 700.0));
    let hero_items = strip(&mut stage, 80.0, 3);
    let hero_group = stage
        .sequencer
        .attach(RevealGroup::new(hero, hero_items), &mut stage.store);
    let _ = stage.observer.observe(hero, ObserveOptions::with_margin(-50.0));

    let stats = strip(&mut stage, 430.0, 2);
    for (&stat, value) in stats.iter().zip([120_u64, 9]) {
        stage.counters.attach(stat, CounterConfig::new(value));
        let _ = stage.observer.observe(stat, ObserveOptions::with_margin(-50.0));
    }

    // -- schedule section: below the fold ----------------------------------
    let section = stage.store.create_target();
    stage
        .store
        .set_bounds(section, Rect::new(0.0, 1_600.0, 1_280.0, 2_400.0));
    let heading = strip(&mut stage, 1_620.0, 1);
    let cards = strip(&mut stage, 1_760.0, 4);

    let mut heading_group = RevealGroup::new(section, heading);
    heading_group.profile = TransitionProfile::Timed {
        delay: Duration::from_millis(100),
        duration: Duration::from_millis(700),
        easing: Easing::EMPHASIZED_OUT,
    };
    heading_group.hidden = HiddenStyle::slide_from_left(20.0);
    let _ = stage.sequencer.attach(heading_group, &mut stage.store);

    let mut card_group = RevealGroup::new(section, cards);
    card_group.base_delay = Duration::from_millis(400);
    let card_group_id = stage.sequencer.attach(card_group, &mut stage.store);

    let _ = stage
        .observer
        .observe(section, ObserveOptions::with_margin(-50.0));

    // -- notification tooltip ----------------------------------------------
    let tooltip = stage.store.create_target();
    stage.mount_notifier(
        NotificationScheduler::new(tooltip, NotificationConfig::default()),
        Instant::ZERO,
    );

    // -- scripted interaction ----------------------------------------------
    let mut script = ScrollScript::new(1_280.0, 800.0);
    script.scroll_to(Instant::from_millis(3_000), 1_500.0);

    let mut ms = 0;
    while ms < RUN_MS {
        match ms {
            // Hover the anchor through the 45s reminder...
            10_000 => stage.pointer_enter(),
            12_000 => stage.pointer_leave(),
            // ...then dismiss the tooltip right after the next show.
            46_000 => stage.dismiss_notification(),
            _ => {}
        }
        let now = Instant::from_millis(ms);
        let mut tracer = Tracer::new(&mut tee);
        stage.tick(now, script.viewport_at(now), &mut writer, &mut tracer);
        ms += TICK_MS;
    }

    let ticks = stage.ticks_run();
    let cards_shown = stage.sequencer.shown_count(card_group_id);
    let hero_shown = stage.sequencer.shown_count(hero_group);
    println!(
        "[done] ticks={ticks} hero_shown={hero_shown} cards_shown={cards_shown} \
         writes={} max_timer_lateness={}ms",
        writer.len(),
        stage.audit.max_lateness().as_millis(),
    );

    stage.teardown();

    // -- export Chrome trace -----------------------------------------------
    let path = "stagger_trace.json";
    let file = File::create(path).expect("failed to create trace file");
    let mut out = BufWriter::new(file);
    stagger_debug::chrome::export(tee.recorder.as_bytes(), &mut out)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} trace bytes)", tee.recorder.as_bytes().len());
}
