// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for incremental re-rendering.
//!
//! Evaluation drains each dirty channel once per batch:
//!
//! 1. **Lifecycle**: ids inserted and removed since the last evaluate. An
//!    id removed and re-created inside one batch appears in both lists, so
//!    documents must process removals before additions.
//! 2. **PROPERTIES**: live ids whose property bag was overwritten.
//! 3. **VISIBILITY**: live ids whose effective visibility must be
//!    recomputed (the patched element plus its descendants).
//! 4. **TOPOLOGY**: drained and discarded; the registry-wide flag becomes
//!    [`SceneChanges::topology_changed`].

use alloc::vec::Vec;

use super::id::ElementId;
use super::registry::ElementRegistry;
use crate::dirty;

/// The set of changes produced by one [`ElementRegistry::evaluate`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneChanges {
    /// Elements inserted since the last evaluate and still live.
    pub added: Vec<ElementId>,
    /// Elements removed since the last evaluate.
    pub removed: Vec<ElementId>,
    /// Live elements whose properties changed.
    pub properties: Vec<ElementId>,
    /// Live elements whose effective visibility may have changed.
    pub visibility: Vec<ElementId>,
    /// Whether parent/child links or the root changed.
    pub topology_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.properties.clear();
        self.visibility.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.properties.is_empty()
            && self.visibility.is_empty()
            && !self.topology_changed
    }
}

impl ElementRegistry {
    /// Drains pending changes.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        changes.topology_changed = self.topology_dirty;
        self.topology_dirty = false;

        let mut removed = core::mem::take(&mut self.pending_removed);
        removed.sort_unstable();
        removed.dedup();
        changes.removed = removed;

        let mut added = core::mem::take(&mut self.pending_added);
        added.sort_unstable();
        added.dedup();
        added.retain(|&id| self.contains(id));
        changes.added = added;

        changes.properties = self.drain_live(dirty::PROPERTIES);
        changes.visibility = self.drain_live(dirty::VISIBILITY);
        let _ = self.drain_live(dirty::TOPOLOGY);
    }

    fn drain_live(&mut self, channel: understory_dirty::Channel) -> Vec<ElementId> {
        let raw: Vec<u32> = self
            .dirty
            .drain(channel)
            .affected()
            .deterministic()
            .run()
            .collect();
        raw.into_iter()
            .map(ElementId)
            .filter(|&id| self.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::*;
    use crate::element::{PropertyBag, Rectangle, keys};

    fn rect(reg: &mut ElementRegistry) -> ElementId {
        let id = reg.allocate_id();
        reg.insert(id, Box::new(Rectangle), PropertyBag::new())
            .unwrap()
    }

    #[test]
    fn fresh_elements_are_reported_once() {
        let mut reg = ElementRegistry::new();
        let a = rect(&mut reg);
        let changes = reg.evaluate();
        assert!(changes.added.contains(&a), "added: {:?}", changes.added);
        assert!(changes.topology_changed, "insert changes topology");

        let again = reg.evaluate();
        assert!(again.is_empty(), "second evaluate: {again:?}");
    }

    #[test]
    fn patch_reports_properties() {
        let mut reg = ElementRegistry::new();
        let a = rect(&mut reg);
        let _ = reg.evaluate();

        reg.patch(a, &PropertyBag::new().with(keys::X, 4)).unwrap();
        let changes = reg.evaluate();
        assert_eq!(changes.properties, [a]);
        assert!(changes.visibility.is_empty(), "x does not touch visibility");
        assert!(!changes.topology_changed, "patch keeps topology");
    }

    #[test]
    fn hiding_parent_marks_descendants() {
        let mut reg = ElementRegistry::new();
        let p = rect(&mut reg);
        let c = rect(&mut reg);
        reg.set_parent(c, p).unwrap();
        let _ = reg.evaluate();

        reg.patch(p, &PropertyBag::new().with(keys::VISIBLE, false))
            .unwrap();
        let changes = reg.evaluate();
        assert!(
            changes.visibility.contains(&p) && changes.visibility.contains(&c),
            "visibility: {:?}",
            changes.visibility
        );
    }

    #[test]
    fn removed_then_recreated_is_in_both_lists() {
        let mut reg = ElementRegistry::new();
        let a = rect(&mut reg);
        let _ = reg.evaluate();

        reg.remove(a).unwrap();
        reg.insert(a, Box::new(Rectangle), PropertyBag::new())
            .unwrap();
        let changes = reg.evaluate();
        assert_eq!(changes.removed, [a]);
        assert_eq!(changes.added, [a]);
    }

    #[test]
    fn created_and_destroyed_in_one_batch_is_not_added() {
        let mut reg = ElementRegistry::new();
        let a = rect(&mut reg);
        reg.remove(a).unwrap();
        let changes = reg.evaluate();
        assert!(changes.added.is_empty(), "added: {:?}", changes.added);
        assert_eq!(changes.removed, [a]);
    }
}
