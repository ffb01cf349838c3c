// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding to the `tracing` ecosystem.

use tandem_core::trace::{
    BatchAppliedEvent, BatchFlushedEvent, CommandAppliedEvent, CommandBufferedEvent, SyncSink,
    ValidatedEvent,
};

/// A [`SyncSink`] that emits each event as a `tracing` event under the
/// `tandem` target. Per-command events are `TRACE`, per-batch events
/// `DEBUG`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl SyncSink for TracingSink {
    fn on_command_buffered(&mut self, e: &CommandBufferedEvent) {
        tracing::trace!(
            target: "tandem",
            name = e.name.as_str(),
            id = e.id.get(),
            coalesced = e.coalesced,
            pending = e.pending,
            "command buffered"
        );
    }

    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        tracing::debug!(target: "tandem", commands = e.commands, "batch flushed");
    }

    fn on_command_applied(&mut self, e: &CommandAppliedEvent) {
        tracing::trace!(
            target: "tandem",
            index = e.index,
            name = e.name.as_str(),
            id = e.id.get(),
            created = e.created,
            "command applied"
        );
    }

    fn on_batch_applied(&mut self, e: &BatchAppliedEvent) {
        tracing::debug!(
            target: "tandem",
            commands = e.commands,
            elements = e.elements,
            "batch applied"
        );
    }

    fn on_validated(&mut self, e: &ValidatedEvent) {
        tracing::debug!(
            target: "tandem",
            elements = e.elements,
            skipped = e.skipped,
            "validated"
        );
    }
}
