// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`SyncSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use tandem_core::trace::{
    BatchAppliedEvent, BatchFlushedEvent, CommandAppliedEvent, CommandBufferedEvent, SyncSink,
    ValidatedEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    label: &'static str,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            label: "",
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, label: "" }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, label: "" }
    }

    /// Prefixes every line with `label`, e.g. `"producer"`.
    #[must_use]
    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn prefix(&self) -> String {
        if self.label.is_empty() {
            String::new()
        } else {
            format!("{}: ", self.label)
        }
    }
}

impl<W: Write> SyncSink for PrettyPrintSink<W> {
    fn on_command_buffered(&mut self, e: &CommandBufferedEvent) {
        let merged = if e.coalesced { " (coalesced)" } else { "" };
        let _ = writeln!(
            self.writer,
            "{}[buffer] {} id={} pending={}{merged}",
            self.prefix(),
            e.name.as_str(),
            e.id,
            e.pending,
        );
    }

    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        let _ = writeln!(
            self.writer,
            "{}[flush] commands={}",
            self.prefix(),
            e.commands
        );
    }

    fn on_command_applied(&mut self, e: &CommandAppliedEvent) {
        let created = if e.created { " created" } else { "" };
        let _ = writeln!(
            self.writer,
            "{}[apply] #{} {} id={}{created}",
            self.prefix(),
            e.index,
            e.name.as_str(),
            e.id,
        );
    }

    fn on_batch_applied(&mut self, e: &BatchAppliedEvent) {
        let _ = writeln!(
            self.writer,
            "{}[batch] commands={} elements={}",
            self.prefix(),
            e.commands,
            e.elements,
        );
    }

    fn on_validated(&mut self, e: &ValidatedEvent) {
        let outcome = if e.skipped { "skipped (live)" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "{}[validate] elements={} {outcome}",
            self.prefix(),
            e.elements,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::command::CommandName;
    use tandem_core::element::ElementId;

    #[test]
    fn pretty_print_buffered() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_command_buffered(&CommandBufferedEvent {
            name: CommandName::Update,
            id: ElementId(4),
            coalesced: true,
            pending: 2,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[buffer] updateElement"), "got: {output}");
        assert!(output.contains("id=4"), "got: {output}");
        assert!(output.contains("coalesced"), "got: {output}");
    }

    #[test]
    fn label_prefixes_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).labeled("renderer");
        sink.on_validated(&ValidatedEvent {
            elements: 3,
            skipped: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "renderer: [validate] elements=3 skipped (live)\n");
    }
}
