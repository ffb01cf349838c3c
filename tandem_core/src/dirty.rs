// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The renderer re-renders incrementally after every batch. Registry
//! mutations mark channels in an [`understory_dirty`] tracker, and
//! [`ElementRegistry::evaluate`](crate::element::ElementRegistry::evaluate)
//! drains them into [`SceneChanges`](crate::element::SceneChanges).
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`VISIBILITY`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) along child → parent
//!   dependency edges. Hiding a group hides its whole subtree, so every
//!   descendant needs its effective visibility recomputed.
//!
//! - **Local-only**: [`PROPERTIES`] is marked with the default policy;
//!   only the patched element is reported.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on insert, remove, and
//!   re-parent. It sets `topology_changed` so the document re-orders its
//!   tree, and does not propagate.

use understory_dirty::Channel;

/// Some property of the element was overwritten.
pub const PROPERTIES: Channel = Channel::new(0);

/// The `visible` flag changed on the element or an ancestor.
pub const VISIBILITY: Channel = Channel::new(1);

/// Parent/child links changed.
pub const TOPOLOGY: Channel = Channel::new(2);
