// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Producer/renderer twin harness.
//!
//! [`Twin`] pairs a producer and a renderer surface in one process and
//! carries batches between them over a [`Channel`](tandem_core::channel::Channel),
//! by default [`JsonChannel`], which puts every batch through its wire
//! encoding. [`diff`] compares the two registries element by element, and
//! [`SyncStats`] counts what crossed the channel.

mod divergence;
mod json_channel;
mod stats;
mod twin;

pub use divergence::{Divergence, assert_mirrored, diff};
pub use json_channel::JsonChannel;
pub use stats::SyncStats;
pub use twin::Twin;
