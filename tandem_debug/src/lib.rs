// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, event recording, and JSON dumps for tandem diagnostics.
//!
//! This crate provides [`SyncSink`](tandem_core::trace::SyncSink)
//! implementations and wire-format helpers for development:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory event log for assertions and
//!   post-mortem export.
//! - [`json`]: batch encoding in the wire shape and JSON export of recorded
//!   events.
//! - `tracing_sink::TracingSink`: forwards events to [`tracing`] (feature
//!   `tracing`).
//!
//! [`tracing`]: https://docs.rs/tracing

pub mod json;
pub mod pretty;
pub mod recorder;
#[cfg(feature = "tracing")]
pub mod tracing_sink;
