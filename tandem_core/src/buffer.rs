// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Producer-side command buffer with update coalescing.
//!
//! Element mutation code may touch the same element many times between two
//! flushes (an animation step setting `x`, then `y`, then `x` again). Only
//! the final value of each key needs to cross the channel, so the buffer
//! keeps at most one pending update per element and folds later updates into
//! it. Destroys are never folded: an update and a destroy for the same id
//! stay separate entries in their original order.
//!
//! A merged update that re-parents its element is moved to the back of the
//! buffer, together with the later entries that depend on it. The new
//! parent may have been created after the element, and the renderer must
//! see re-appends in the order the producer made them.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::command::{Batch, Command, CommandName, CommandOptions, ElementOptions};
use crate::element::ElementId;
use crate::trace::{CommandBufferedEvent, Tracer};

/// Ordered, append-only (between flushes) sequence of pending commands.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    /// Position of the pending update for each id.
    pending_update: BTreeMap<ElementId, usize>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a mutation of `element`.
    ///
    /// Bookkeeping keys are stripped, the remainder is cloned and stamped
    /// with the element id. An update for an id that already has a pending
    /// update is merged into it (later keys win) instead of appended.
    ///
    /// Returns `true` if the command was merged into an existing entry.
    pub fn add(
        &mut self,
        name: CommandName,
        element: ElementId,
        options: &ElementOptions,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let stamped = CommandOptions::stamp(element, options);
        let coalesced = self.push(name, stamped);
        tracer.command_buffered(&CommandBufferedEvent {
            name,
            id: element,
            coalesced,
            pending: self.commands.len(),
        });
        coalesced
    }

    /// Records an already-stamped command, coalescing updates.
    ///
    /// Returns `true` if it was merged into a pending update.
    pub fn push(&mut self, name: CommandName, options: CommandOptions) -> bool {
        if name == CommandName::Update {
            if let Some(&idx) = self.pending_update.get(&options.id) {
                self.commands[idx].options.merge(&options);
                if options.parent.is_some() {
                    self.move_to_back(idx);
                }
                return true;
            }
            self.pending_update.insert(options.id, self.commands.len());
        } else {
            // A later update for this id must not be folded into one that
            // precedes the destroy.
            self.pending_update.remove(&options.id);
        }
        self.commands.push(Command { name, options });
        false
    }

    /// Moves the entry at `idx` behind everything else.
    ///
    /// Later entries go along when they address an element that moved or
    /// name one as their parent, keeping their relative order. Entries left
    /// in place never refer to a moved element.
    fn move_to_back(&mut self, idx: usize) {
        let tail = self.commands.split_off(idx);
        let mut moved_ids = BTreeSet::new();
        let mut moved = Vec::new();
        for (i, command) in tail.into_iter().enumerate() {
            let depends = i == 0
                || moved_ids.contains(&command.id())
                || command
                    .options
                    .parent
                    .is_some_and(|p| moved_ids.contains(&p));
            if depends {
                moved_ids.insert(command.id());
                moved.push(command);
            } else {
                self.commands.push(command);
            }
        }
        self.commands.extend(moved);

        self.pending_update.clear();
        for (i, command) in self.commands.iter().enumerate() {
            match command.name {
                CommandName::Update => {
                    self.pending_update.insert(command.id(), i);
                }
                CommandName::Destroy => {
                    self.pending_update.remove(&command.id());
                }
            }
        }
    }

    /// Returns the buffered commands and leaves the buffer empty.
    pub fn flush(&mut self) -> Batch {
        self.pending_update.clear();
        core::mem::take(&mut self.commands)
    }

    /// Returns the pending commands without flushing.
    #[must_use]
    pub fn pending(&self) -> &[Command] {
        &self.commands
    }

    /// Number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
