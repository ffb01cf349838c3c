// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::VecDeque;

use tandem_core::SyncError;
use tandem_core::channel::Channel;
use tandem_core::command::Batch;

/// A [`Channel`] that carries batches as JSON text.
///
/// Each batch is encoded on [`send`](Channel::send) and decoded on
/// [`receive`](Channel::receive), so anything that does not survive the wire
/// format shows up as a divergence between the twins.
#[derive(Debug, Default)]
pub struct JsonChannel {
    queue: VecDeque<String>,
    bytes_sent: usize,
    failures: usize,
}

impl JsonChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total encoded bytes sent so far.
    #[must_use]
    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    /// Batches that failed to encode or decode. Each failure was also
    /// returned to the caller as [`SyncError::Transport`].
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Encoded batches not yet received, oldest first.
    pub fn in_flight(&self) -> impl Iterator<Item = &str> + '_ {
        self.queue.iter().map(String::as_str)
    }

    /// Queues raw text as if it had been sent.
    pub fn send_raw(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.bytes_sent += text.len();
        self.queue.push_back(text);
    }

    fn lost(&mut self, reason: String) -> SyncError {
        self.failures += 1;
        SyncError::Transport { reason }
    }
}

impl Channel for JsonChannel {
    fn send(&mut self, batch: Batch) -> Result<(), SyncError> {
        match serde_json::to_string(&batch) {
            Ok(text) => {
                self.send_raw(text);
                Ok(())
            }
            Err(err) => {
                tracing::error!(%err, commands = batch.len(), "batch failed to encode");
                Err(self.lost(format!("encode: {err}")))
            }
        }
    }

    fn receive(&mut self) -> Result<Option<Batch>, SyncError> {
        let Some(text) = self.queue.pop_front() else {
            return Ok(None);
        };
        serde_json::from_str::<Batch>(&text).map(Some).map_err(|err| {
            tracing::error!(%err, "batch failed to decode");
            self.lost(format!("decode: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::command::{Command, CommandOptions};
    use tandem_core::element::ElementId;

    #[test]
    fn batches_cross_as_wire_json() {
        let mut ch = JsonChannel::new();
        ch.send(vec![Command::update(
            CommandOptions::new(ElementId(1)).typed("Group"),
        )])
        .unwrap();
        ch.send(Vec::new()).unwrap();

        let text: Vec<_> = ch.in_flight().collect();
        assert_eq!(
            text[0],
            r#"[{"name":"updateElement","options":{"id":1,"type":"Group"}}]"#
        );
        assert_eq!(ch.bytes_sent(), text[0].len() + 2);

        assert_eq!(ch.receive().unwrap().unwrap()[0].id(), ElementId(1));
        assert!(
            ch.receive().unwrap().unwrap().is_empty(),
            "empty batch delivered"
        );
        assert_eq!(ch.receive(), Ok(None));
        assert_eq!(ch.failures(), 0);
    }

    #[test]
    fn undecodable_batch_is_reported_not_skipped() {
        let mut ch = JsonChannel::new();
        ch.send_raw("[{\"name\":\"renameElement\"}]");
        ch.send(vec![Command::destroy(ElementId(2))]).unwrap();

        assert!(
            matches!(ch.receive(), Err(SyncError::Transport { .. })),
            "lost batch surfaces as an error"
        );
        assert_eq!(ch.failures(), 1);
        assert_eq!(ch.receive().unwrap().unwrap()[0].id(), ElementId(2));
    }

    #[test]
    fn non_finite_numbers_fail_to_encode() {
        let mut ch = JsonChannel::new();
        let err = ch
            .send(vec![Command::update(
                CommandOptions::new(ElementId(1)).with("x", f64::NAN),
            )])
            .unwrap_err();
        assert!(matches!(err, SyncError::Transport { .. }), "got {err:?}");
        assert_eq!(ch.in_flight().count(), 0);
        assert_eq!(ch.failures(), 1);
    }
}
