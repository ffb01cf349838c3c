// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command protocol that mirrors a scene graph between two contexts.
//!
//! `tandem_core` keeps two copies of a hierarchical element tree in step: a
//! *producer* that owns the authoritative scene but cannot render, and a
//! *renderer* that owns a document it can draw into. The two share no memory;
//! every mutation on the producer becomes a [`Command`](command::Command) that
//! is buffered, coalesced, flushed as a [`Batch`](command::Batch), carried
//! across by an external transport, and applied in order on the renderer.
//!
//! The crate is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Producer                                  Renderer
//!   ────────                                  ────────
//!   Surface::set / create / destroy
//!       │
//!       ▼
//!   element_updated / element_destroyed
//!       │
//!       ▼
//!   CommandBuffer::add (coalesce)
//!       │
//!       ▼
//!   CommandBuffer::flush ──► Batch ──► Channel ──► Surface::execute
//!                                                     │
//!                                                     ▼
//!                                          CommandApplier::execute
//!                                                     │
//!                                                     ▼
//!                                   ElementRegistry::evaluate ──► Document::render
//!                                                     │
//!                                                     ▼
//!                                               validate (debug)
//! ```
//!
//! **[`element`]**: Element ids, property bags, element kinds, and the
//! per-surface [`ElementRegistry`](element::ElementRegistry). Ids come from a
//! counter that restarts at zero for every surface, so both sides agree on
//! ids without ever comparing objects across contexts.
//!
//! **[`command`]**: Wire model types [`CommandName`](command::CommandName),
//! [`CommandOptions`](command::CommandOptions), and [`Batch`](command::Batch).
//! With the `serde` feature the batch serializes to
//! `[{ "name": "updateElement", "options": { "id": 0, ... } }]`.
//!
//! **[`buffer`]**: Producer-side buffer with per-id update coalescing.
//!
//! **[`apply`]**: Renderer-side ordered application with lazy creation.
//!
//! **[`factory`]**: Type-tag → constructor registry used to materialize
//! elements named by an update.
//!
//! **[`document`]**: The [`Document`](document::Document) trait that
//! rendering backends implement; [`headless`] is an in-memory implementation.
//!
//! **[`validate`]**: Cross-checks the registry against the rendered
//! document.
//!
//! **[`surface`]**: Role bootstrap that owns all of the above.
//!
//! **[`channel`]**: The transport seam and an in-memory FIFO.
//!
//! **[`dirty`]** and **[`error`]**: Dirty channel constants and fault types.
//!
//! **[`trace`]**: [`SyncSink`](trace::SyncSink) instrumentation with a
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `serde` (disabled by default): Derives `Serialize`/`Deserialize` for the
//!   wire types.
//! - `trace` (disabled by default): Enables `Tracer` method bodies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod apply;
pub mod buffer;
pub mod channel;
pub mod command;
pub mod dirty;
pub mod document;
pub mod element;
pub mod error;
pub mod factory;
pub mod headless;
pub mod surface;
pub mod trace;
pub mod validate;

pub use error::{SyncError, ValidationFault};
pub use surface::{Role, Surface, SurfaceConfig};
