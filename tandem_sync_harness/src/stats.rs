// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tandem_core::command::{Batch, CommandName};

/// Running counts of what crossed the channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Batches applied on the renderer.
    pub batches: u64,
    /// Update commands applied.
    pub updates: u64,
    /// Destroy commands applied.
    pub destroys: u64,
    /// Largest batch seen, in commands.
    pub largest_batch: usize,
}

impl SyncStats {
    /// Accounts for one applied batch.
    pub fn observe(&mut self, batch: &Batch) {
        self.batches = self.batches.saturating_add(1);
        self.largest_batch = self.largest_batch.max(batch.len());
        for command in batch {
            match command.name {
                CommandName::Update => self.updates = self.updates.saturating_add(1),
                CommandName::Destroy => self.destroys = self.destroys.saturating_add(1),
            }
        }
    }

    /// Total commands applied.
    #[must_use]
    pub fn commands(&self) -> u64 {
        self.updates.saturating_add(self.destroys)
    }
}
