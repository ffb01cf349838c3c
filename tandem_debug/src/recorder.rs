// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`SyncSink`] and keeps every event it sees, in
//! order, as a [`RecordedEvent`]. Tests assert on the log directly;
//! [`json::export_events`](crate::json::export_events) turns it into JSON.

use tandem_core::command::CommandName;
use tandem_core::trace::{
    BatchAppliedEvent, BatchFlushedEvent, CommandAppliedEvent, CommandBufferedEvent, SyncSink,
    ValidatedEvent,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// See [`SyncSink::on_command_buffered`].
    CommandBuffered(CommandBufferedEvent),
    /// See [`SyncSink::on_batch_flushed`].
    BatchFlushed(BatchFlushedEvent),
    /// See [`SyncSink::on_command_applied`].
    CommandApplied(CommandAppliedEvent),
    /// See [`SyncSink::on_batch_applied`].
    BatchApplied(BatchAppliedEvent),
    /// See [`SyncSink::on_validated`].
    Validated(ValidatedEvent),
}

/// A [`SyncSink`] that appends every event to a log.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the log.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Number of updates merged into an already pending command.
    #[must_use]
    pub fn coalesced(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::CommandBuffered(b) if b.coalesced))
            .count()
    }

    /// Number of elements the renderer materialized.
    #[must_use]
    pub fn created(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    RecordedEvent::CommandApplied(a) if a.name == CommandName::Update && a.created
                )
            })
            .count()
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SyncSink for RecorderSink {
    fn on_command_buffered(&mut self, e: &CommandBufferedEvent) {
        self.events.push(RecordedEvent::CommandBuffered(*e));
    }

    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        self.events.push(RecordedEvent::BatchFlushed(*e));
    }

    fn on_command_applied(&mut self, e: &CommandAppliedEvent) {
        self.events.push(RecordedEvent::CommandApplied(*e));
    }

    fn on_batch_applied(&mut self, e: &BatchAppliedEvent) {
        self.events.push(RecordedEvent::BatchApplied(*e));
    }

    fn on_validated(&mut self, e: &ValidatedEvent) {
        self.events.push(RecordedEvent::Validated(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::command::ElementOptions;
    use tandem_core::element::Rectangle;
    use tandem_core::factory::TypeRegistry;
    use tandem_core::headless::HeadlessDocument;
    use tandem_core::trace::Tracer;
    use tandem_core::{Surface, SurfaceConfig};

    #[test]
    fn records_a_full_round_trip() {
        let mut producer_log = RecorderSink::new();
        let mut renderer_log = RecorderSink::new();

        let mut producer =
            Surface::producer(SurfaceConfig::default(), TypeRegistry::with_builtins()).unwrap();
        let mut renderer = Surface::renderer(
            SurfaceConfig::default(),
            TypeRegistry::with_builtins(),
            Box::new(HeadlessDocument::new()),
        );

        let mut tracer = Tracer::new(&mut producer_log);
        let id = producer
            .create_traced(Rectangle::TAG, ElementOptions::new(), &mut tracer)
            .unwrap();
        producer
            .set_traced(id, ElementOptions::new().with("x", 4), &mut tracer)
            .unwrap();
        let batch = producer.flush_traced(&mut tracer).unwrap();

        renderer
            .execute_traced(&batch, &mut Tracer::new(&mut renderer_log))
            .unwrap();

        assert_eq!(producer_log.coalesced(), 1);
        assert!(
            matches!(
                producer_log.events().last(),
                Some(RecordedEvent::BatchFlushed(BatchFlushedEvent { commands: 2 }))
            ),
            "root and rectangle flushed"
        );
        assert_eq!(renderer_log.created(), 2);
        assert!(
            matches!(
                renderer_log.events().last(),
                Some(RecordedEvent::Validated(ValidatedEvent { skipped: false, .. }))
            ),
            "validation ran last"
        );
    }
}
