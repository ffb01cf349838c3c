// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated animation loop that exercises the sync and tracing pipeline.
//!
//! Builds a small scene on the producer, then moves a rectangle across the
//! surface for 30 frames, syncing after each one. Producer events go to a
//! [`PrettyPrintSink`]; renderer events go to a second one and to a
//! [`RecorderSink`], whose log is exported as JSON at the end.

use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;
use tandem_core::command::ElementOptions;
use tandem_core::element::{Group, Rectangle, keys};
use tandem_core::trace::{
    BatchAppliedEvent, BatchFlushedEvent, CommandAppliedEvent, CommandBufferedEvent, SyncSink,
    Tracer, ValidatedEvent,
};
use tandem_core::SurfaceConfig;
use tandem_debug::pretty::PrettyPrintSink;
use tandem_debug::recorder::RecorderSink;
use tandem_sync_harness::{Twin, assert_mirrored};

const FRAME_COUNT: u32 = 30;
const BOUNDS: Rect = Rect::new(0.0, 0.0, 320.0, 200.0);

/// Forwards every event to two sinks.
struct Tee<'a>(&'a mut dyn SyncSink, &'a mut dyn SyncSink);

impl SyncSink for Tee<'_> {
    fn on_command_buffered(&mut self, e: &CommandBufferedEvent) {
        self.0.on_command_buffered(e);
        self.1.on_command_buffered(e);
    }

    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        self.0.on_batch_flushed(e);
        self.1.on_batch_flushed(e);
    }

    fn on_command_applied(&mut self, e: &CommandAppliedEvent) {
        self.0.on_command_applied(e);
        self.1.on_command_applied(e);
    }

    fn on_batch_applied(&mut self, e: &BatchAppliedEvent) {
        self.0.on_batch_applied(e);
        self.1.on_batch_applied(e);
    }

    fn on_validated(&mut self, e: &ValidatedEvent) {
        self.0.on_validated(e);
        self.1.on_validated(e);
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut producer_out = PrettyPrintSink::new(Box::new(std::io::stdout())).labeled("producer");
    let mut renderer_out = PrettyPrintSink::new(Box::new(std::io::stdout())).labeled("renderer");
    let mut recorder = RecorderSink::new();

    // -- scene -------------------------------------------------------------
    let mut twin = Twin::new(SurfaceConfig::debug(BOUNDS)).expect("failed to create surfaces");
    let p = twin.producer_mut();
    let lane = p
        .create(Group::TAG, ElementOptions::new())
        .expect("failed to create group");
    let ball = p
        .create(
            Rectangle::TAG,
            ElementOptions::new()
                .parent(lane)
                .with(keys::W, 20)
                .with(keys::H, 20)
                .with("fill", "tomato"),
        )
        .expect("failed to create rectangle");

    {
        let mut producer = Tracer::new(&mut producer_out);
        let mut tee = Tee(&mut renderer_out, &mut recorder);
        let mut renderer = Tracer::new(&mut tee);

        twin.sync_traced(&mut producer, &mut renderer)
            .expect("initial sync failed");

        // -- simulated loop --------------------------------------------------
        for frame in 0..FRAME_COUNT {
            let x = f64::from(frame) * (BOUNDS.width() - 20.0) / f64::from(FRAME_COUNT - 1);
            // Two writes per frame; the buffer sends one command.
            twin.producer_mut()
                .set_traced(ball, ElementOptions::new().with(keys::X, x), &mut producer)
                .expect("set failed");
            twin.producer_mut()
                .set_traced(ball, ElementOptions::new().with(keys::Y, 90), &mut producer)
                .expect("set failed");
            twin.sync_traced(&mut producer, &mut renderer)
                .expect("sync failed");
        }

        twin.producer_mut()
            .destroy_traced(lane, &mut producer)
            .expect("destroy failed");
        twin.sync_traced(&mut producer, &mut renderer)
            .expect("final sync failed");
    }

    assert_mirrored(twin.producer().registry(), twin.renderer().registry());

    // -- export ------------------------------------------------------------
    let path = "sync_trace.json";
    let file = File::create(path).expect("failed to create sync_trace.json");
    let mut writer = BufWriter::new(file);
    tandem_debug::json::export_events(recorder.events(), &mut writer)
        .expect("failed to write event log");

    let stats = twin.stats();
    println!(
        "Wrote {path} ({} batches, {} updates, {} destroys, {} bytes on the wire)",
        stats.batches,
        stats.updates,
        stats.destroys,
        twin.channel().bytes_sent(),
    );
}
