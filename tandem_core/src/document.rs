// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering-backend contract.
//!
//! The renderer side of a surface owns something it can draw into: a DOM
//! subtree, a native view hierarchy, or the in-memory
//! [`HeadlessDocument`](crate::headless::HeadlessDocument). Backends
//! implement [`Document`] to
//!
//! - apply the [`SceneChanges`] drained from the registry after each batch,
//! - attach the root exactly once to their mount point, and
//! - answer the two queries the consistency validator needs.
//!
//! # Re-render pseudocode
//!
//! ```rust,ignore
//! fn after_batch(registry: &mut ElementRegistry, doc: &mut dyn Document) {
//!     let changes = registry.evaluate();
//!     doc.render(registry, &changes);
//!     if doc.mounted_root().is_none() {
//!         if let Some(root) = registry.root() {
//!             doc.mount(root);
//!         }
//!     }
//! }
//! ```

use alloc::vec::Vec;

use crate::element::{ElementId, ElementRegistry, SceneChanges};

/// A renderable document mirroring an [`ElementRegistry`].
pub trait Document {
    /// Applies `changes` to the rendered tree, reading current element state
    /// from `registry` as needed.
    fn render(&mut self, registry: &ElementRegistry, changes: &SceneChanges);

    /// Attaches the rendered element for `root` to the mount point.
    ///
    /// Called once, the first time a root has been rendered.
    fn mount(&mut self, root: ElementId);

    /// Returns the root attached to the mount point, if any.
    fn mounted_root(&self) -> Option<ElementId>;

    /// Returns the ids of every rendered element reachable from the mounted
    /// root, the root included. Empty when nothing is mounted.
    fn rendered_ids(&self) -> Vec<ElementId>;

    /// Returns how many rendered elements anywhere in the document carry
    /// `id`.
    fn count_by_id(&self, id: ElementId) -> usize;
}
