// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the synchronization pipeline.
//!
//! This module provides a [`SyncSink`] trait with per-event methods that the
//! buffer, applier, and surface call at each stage. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn SyncSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

use crate::command::CommandName;
use crate::element::ElementId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted by the producer each time a mutation reaches the buffer.
#[derive(Clone, Copy, Debug)]
pub struct CommandBufferedEvent {
    /// Which mutation.
    pub name: CommandName,
    /// Target element.
    pub id: ElementId,
    /// Whether the update was folded into a pending one.
    pub coalesced: bool,
    /// Buffer length after the call.
    pub pending: usize,
}

/// Emitted when the producer flushes its buffer.
#[derive(Clone, Copy, Debug)]
pub struct BatchFlushedEvent {
    /// Commands in the flushed batch.
    pub commands: usize,
}

/// Emitted by the renderer after each command is applied.
#[derive(Clone, Copy, Debug)]
pub struct CommandAppliedEvent {
    /// Position within the batch.
    pub index: usize,
    /// Which mutation.
    pub name: CommandName,
    /// Target element.
    pub id: ElementId,
    /// Whether an update materialized a new element.
    pub created: bool,
}

/// Emitted once a whole batch has been applied and re-rendered.
#[derive(Clone, Copy, Debug)]
pub struct BatchAppliedEvent {
    /// Commands in the batch.
    pub commands: usize,
    /// Live elements after the batch.
    pub elements: usize,
}

/// Emitted after the consistency check ran (or was skipped).
#[derive(Clone, Copy, Debug)]
pub struct ValidatedEvent {
    /// Registry entries checked.
    pub elements: usize,
    /// `true` when the surface is live and the check did not run.
    pub skipped: bool,
}

// ---------------------------------------------------------------------------
// SyncSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the synchronization pipeline.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait SyncSink {
    /// Called when a command is buffered on the producer.
    fn on_command_buffered(&mut self, e: &CommandBufferedEvent) {
        _ = e;
    }

    /// Called when the producer flushes.
    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        _ = e;
    }

    /// Called after each command is applied on the renderer.
    fn on_command_applied(&mut self, e: &CommandAppliedEvent) {
        _ = e;
    }

    /// Called after a whole batch is applied and rendered.
    fn on_batch_applied(&mut self, e: &BatchAppliedEvent) {
        _ = e;
    }

    /// Called after validation.
    fn on_validated(&mut self, e: &ValidatedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`SyncSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl SyncSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`SyncSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn SyncSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn SyncSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn SyncSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`CommandBufferedEvent`].
    #[inline]
    pub fn command_buffered(&mut self, e: &CommandBufferedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_command_buffered(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BatchFlushedEvent`].
    #[inline]
    pub fn batch_flushed(&mut self, e: &BatchFlushedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_batch_flushed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommandAppliedEvent`].
    #[inline]
    pub fn command_applied(&mut self, e: &CommandAppliedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_command_applied(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BatchAppliedEvent`].
    #[inline]
    pub fn batch_applied(&mut self, e: &BatchAppliedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_batch_applied(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ValidatedEvent`].
    #[inline]
    pub fn validated(&mut self, e: &ValidatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_validated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
