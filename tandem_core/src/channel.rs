// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transport between producer and renderer.
//!
//! The protocol relies on the transport for ordering: batches must arrive
//! exactly once and in the order they were sent. A channel that loses a
//! batch must say so with [`SyncError::Transport`] rather than carry on.

use alloc::collections::VecDeque;

use crate::command::Batch;
use crate::error::SyncError;

/// A FIFO, exactly-once carrier of batches.
pub trait Channel {
    /// Hands a flushed batch to the transport.
    ///
    /// # Errors
    ///
    /// [`SyncError::Transport`] if the batch could not be accepted.
    fn send(&mut self, batch: Batch) -> Result<(), SyncError>;

    /// Takes the oldest batch not yet received.
    ///
    /// # Errors
    ///
    /// [`SyncError::Transport`] if the oldest batch was lost. Later batches
    /// stay queued.
    fn receive(&mut self) -> Result<Option<Batch>, SyncError>;
}

/// In-process channel backed by a queue.
#[derive(Debug, Default)]
pub struct Loopback {
    queue: VecDeque<Batch>,
}

impl Loopback {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.queue.len()
    }
}

impl Channel for Loopback {
    fn send(&mut self, batch: Batch) -> Result<(), SyncError> {
        self.queue.push_back(batch);
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<Batch>, SyncError> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::command::Command;
    use crate::element::ElementId;

    #[test]
    fn delivers_in_send_order() {
        let mut ch = Loopback::new();
        ch.send(vec![Command::destroy(ElementId(1))]).unwrap();
        ch.send(vec![Command::destroy(ElementId(2))]).unwrap();
        assert_eq!(ch.in_flight(), 2);
        assert_eq!(ch.receive().unwrap().unwrap()[0].id(), ElementId(1));
        assert_eq!(ch.receive().unwrap().unwrap()[0].id(), ElementId(2));
        assert_eq!(ch.receive(), Ok(None));
    }
}
