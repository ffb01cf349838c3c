// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface element storage with id allocation, topology, and properties.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::ElementId;
use super::kind::ElementKind;
use super::props::{PropertyBag, keys};
use super::traverse::{Children, Descendants};
use crate::dirty;
use crate::error::{IdUse, SyncError};

/// One node of the scene graph.
///
/// The parent link is a plain id (a weak back-reference); the parent owns
/// the ordered list of its children.
#[derive(Debug)]
pub struct Element {
    id: ElementId,
    kind: Box<dyn ElementKind>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    props: PropertyBag,
    root: bool,
}

impl Element {
    /// Returns the element's id.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Returns the type tag of the element's kind.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Returns the element's kind.
    #[must_use]
    pub fn kind(&self) -> &dyn ElementKind {
        &*self.kind
    }

    /// Returns the parent id, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Returns the ordered child ids.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Returns the element's properties.
    #[must_use]
    pub fn props(&self) -> &PropertyBag {
        &self.props
    }

    /// Returns whether this is the surface root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.root
    }
}

/// Storage for every live element of one surface.
///
/// Ids are allocated by a counter that starts at zero when the registry is
/// created (or [`reset`](Self::reset)), which is what lets the producer and
/// renderer registries agree on ids. Mutations mark dirty channels (see
/// [`dirty`](crate::dirty)); [`evaluate`](Self::evaluate) drains them into
/// [`SceneChanges`](super::SceneChanges) for the document to consume.
#[derive(Debug)]
pub struct ElementRegistry {
    pub(crate) elements: BTreeMap<ElementId, Element>,
    next_id: u32,
    root: Option<ElementId>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) topology_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<ElementId>,
    pub(crate) pending_removed: Vec<ElementId>,
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementRegistry {
    /// Creates an empty registry whose counter starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: BTreeMap::new(),
            next_id: 0,
            root: None,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            topology_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    /// Drops every element and restarts the id counter at zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -- Allocation API --

    /// Returns the id the counter will hand out next.
    #[must_use]
    pub fn peek_next_id(&self) -> ElementId {
        ElementId(self.next_id)
    }

    /// Takes the next id from the counter.
    pub fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Inserts an unattached element under `id`.
    ///
    /// The counter is advanced past `id` so locally allocated ids never
    /// collide with ids that arrived over the wire.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::DuplicateId`] if `id` is already live.
    pub fn insert(
        &mut self,
        id: ElementId,
        kind: Box<dyn ElementKind>,
        props: PropertyBag,
    ) -> Result<ElementId, SyncError> {
        if self.elements.contains_key(&id) {
            return Err(SyncError::DuplicateId { id });
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.elements.insert(
            id,
            Element {
                id,
                kind,
                parent: None,
                children: Vec::new(),
                props,
                root: false,
            },
        );

        self.pending_added.push(id);
        self.topology_dirty = true;
        self.dirty.mark(id.0, dirty::TOPOLOGY);
        self.dirty.mark(id.0, dirty::PROPERTIES);
        Ok(id)
    }

    /// Removes an element, detaching it from its parent.
    ///
    /// Children still attached are detached too and left in the registry
    /// without a parent; the producer always destroys children first, so
    /// on a healthy renderer this never happens, and if it does the
    /// validator reports the stranded elements.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownId`] if `id` is not live.
    pub fn remove(&mut self, id: ElementId) -> Result<Element, SyncError> {
        if !self.elements.contains_key(&id) {
            return Err(SyncError::UnknownId {
                id,
                op: IdUse::Destroy,
            });
        }
        self.unlink_from_parent(id);

        let Some(mut element) = self.elements.remove(&id) else {
            return Err(SyncError::UnknownId {
                id,
                op: IdUse::Destroy,
            });
        };
        for child in element.children.drain(..) {
            if let Some(c) = self.elements.get_mut(&child) {
                c.parent = None;
            }
            self.dirty.remove_dependency(child.0, id.0, dirty::VISIBILITY);
            self.dirty.mark(child.0, dirty::TOPOLOGY);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        self.dirty.remove_key(id.0);
        self.pending_removed.push(id);
        self.topology_dirty = true;
        Ok(element)
    }

    /// Returns whether `id` is live.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Returns the element with the given id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if no element is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates live ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    /// Iterates live elements in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.values()
    }

    // -- Root --

    /// Returns the root element id, if one has been designated.
    #[must_use]
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Makes `id` the root, clearing the flag on any previous root.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownId`] if `id` is not live.
    pub fn set_root(&mut self, id: ElementId) -> Result<(), SyncError> {
        if !self.elements.contains_key(&id) {
            return Err(SyncError::UnknownId {
                id,
                op: IdUse::Patch,
            });
        }
        if let Some(old) = self.root.and_then(|r| self.elements.get_mut(&r)) {
            old.root = false;
        }
        if let Some(e) = self.elements.get_mut(&id) {
            e.root = true;
        }
        self.root = Some(id);
        self.topology_dirty = true;
        Ok(())
    }

    // -- Topology API --

    /// Returns the parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(&id).and_then(|e| e.parent)
    }

    /// Returns an iterator over the direct children of `id`.
    ///
    /// Unknown ids have no children.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Children<'_> {
        Children::new(self.elements.get(&id).map_or(&[][..], |e| e.children.as_slice()))
    }

    /// Returns a pre-order iterator over `id` and all of its descendants.
    #[must_use]
    pub fn descendants(&self, id: ElementId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    /// Returns the pre-order traversal from the root, or nothing if there
    /// is no root.
    #[must_use]
    pub fn traversal_order(&self) -> Vec<ElementId> {
        self.root
            .map(|r| self.descendants(r).collect())
            .unwrap_or_default()
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Re-attaching to the current parent moves
    /// `child` behind its siblings, so replaying the same call on another
    /// registry reproduces the sibling order.
    ///
    /// Marks `child`'s subtree for visibility recomputation, since visibility
    /// is inherited.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownId`] if either id is not live, and
    /// [`SyncError::Cycle`] if `parent` is `child` or one of its descendants.
    pub fn set_parent(&mut self, child: ElementId, parent: ElementId) -> Result<(), SyncError> {
        for id in [child, parent] {
            if !self.elements.contains_key(&id) {
                return Err(SyncError::UnknownId {
                    id,
                    op: IdUse::Parent,
                });
            }
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SyncError::Cycle { child, parent });
        }

        if let Some(old) = self.parent(child) {
            self.unlink_from_parent(child);
            self.dirty.mark(old.0, dirty::TOPOLOGY);
        }

        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(child);
        }

        // Child depends on parent for VISIBILITY.
        let _ = self.dirty.add_dependency(child.0, parent.0, dirty::VISIBILITY);

        self.dirty
            .mark_with(child.0, dirty::VISIBILITY, &EagerPolicy);
        self.topology_dirty = true;
        self.dirty.mark(parent.0, dirty::TOPOLOGY);
        Ok(())
    }

    // -- Property API (auto-marks dirty) --

    /// Overwrites the given properties of `id`; keys not in `patch` are left
    /// alone.
    ///
    /// Marks PROPERTIES locally, and VISIBILITY with eager propagation when
    /// the patch touches [`keys::VISIBLE`].
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownId`] if `id` is not live.
    pub fn patch(&mut self, id: ElementId, patch: &PropertyBag) -> Result<(), SyncError> {
        let Some(e) = self.elements.get_mut(&id) else {
            return Err(SyncError::UnknownId {
                id,
                op: IdUse::Patch,
            });
        };
        e.props.merge(patch);
        self.dirty.mark(id.0, dirty::PROPERTIES);
        if patch.contains_key(keys::VISIBLE) {
            self.dirty.mark_with(id.0, dirty::VISIBILITY, &EagerPolicy);
        }
        Ok(())
    }

    /// Returns whether the element is drawn, taking hidden ancestors into
    /// account. Elements without a `visible` property are visible.
    ///
    /// The root's own flag only hides the root: it is the surface backdrop,
    /// and the scene drawn on it stays visible.
    #[must_use]
    pub fn effective_visible(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(cur) = cursor {
            let Some(e) = self.elements.get(&cur) else {
                return false;
            };
            if e.props.flag(keys::VISIBLE) == Some(false) && (cur == id || !e.root) {
                return false;
            }
            cursor = e.parent;
        }
        true
    }

    // -- Internal helpers --

    /// Returns whether `ancestor` is `id` or lies on `id`'s parent chain.
    fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(cur) = cursor {
            if cur == ancestor {
                return true;
            }
            cursor = self.parent(cur);
        }
        false
    }

    /// Removes `id` from its parent's child list.
    fn unlink_from_parent(&mut self, id: ElementId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(c) = self.elements.get_mut(&id) {
            c.parent = None;
        }
        self.dirty.remove_dependency(id.0, parent.0, dirty::VISIBILITY);
        self.dirty.mark(parent.0, dirty::TOPOLOGY);
        self.topology_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use super::*;
    use crate::element::{Group, Rectangle};

    fn rect(reg: &mut ElementRegistry) -> ElementId {
        let id = reg.allocate_id();
        reg.insert(id, Box::new(Rectangle), PropertyBag::new())
            .unwrap()
    }

    #[test]
    fn counter_starts_at_zero_and_resets() {
        let mut reg = ElementRegistry::new();
        assert_eq!(rect(&mut reg), ElementId(0));
        assert_eq!(rect(&mut reg), ElementId(1));
        reg.reset();
        assert!(reg.is_empty());
        assert_eq!(rect(&mut reg), ElementId(0));
    }

    #[test]
    fn insert_advances_counter_past_explicit_id() {
        let mut reg = ElementRegistry::new();
        reg.insert(ElementId(5), Box::new(Group), PropertyBag::new())
            .unwrap();
        assert_eq!(reg.peek_next_id(), ElementId(6));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut reg = ElementRegistry::new();
        let id = rect(&mut reg);
        let err = reg
            .insert(id, Box::new(Rectangle), PropertyBag::new())
            .unwrap_err();
        assert_eq!(err, SyncError::DuplicateId { id });
    }

    #[test]
    fn set_parent_and_query() {
        let mut reg = ElementRegistry::new();
        let root = rect(&mut reg);
        let a = rect(&mut reg);
        let b = rect(&mut reg);
        reg.set_parent(a, root).unwrap();
        reg.set_parent(b, root).unwrap();

        assert_eq!(reg.parent(a), Some(root));
        let kids: Vec<_> = reg.children(root).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn reparent_moves_between_lists() {
        let mut reg = ElementRegistry::new();
        let p1 = rect(&mut reg);
        let p2 = rect(&mut reg);
        let c = rect(&mut reg);
        reg.set_parent(c, p1).unwrap();
        reg.set_parent(c, p2).unwrap();
        assert_eq!(reg.parent(c), Some(p2));
        assert!(reg.children(p1).next().is_none());
    }

    #[test]
    fn reattaching_to_same_parent_moves_to_end() {
        let mut reg = ElementRegistry::new();
        let p = rect(&mut reg);
        let a = rect(&mut reg);
        let b = rect(&mut reg);
        reg.set_parent(a, p).unwrap();
        reg.set_parent(b, p).unwrap();
        let _ = reg.evaluate();

        reg.set_parent(a, p).unwrap();
        assert_eq!(reg.children(p).collect::<Vec<_>>(), [b, a]);
        assert!(reg.evaluate().topology_changed, "re-append is a topology change");
    }

    #[test]
    fn cycles_are_rejected() {
        let mut reg = ElementRegistry::new();
        let a = rect(&mut reg);
        let b = rect(&mut reg);
        reg.set_parent(b, a).unwrap();
        assert_eq!(
            reg.set_parent(a, b),
            Err(SyncError::Cycle {
                child: a,
                parent: b
            })
        );
        assert_eq!(
            reg.set_parent(a, a),
            Err(SyncError::Cycle {
                child: a,
                parent: a
            })
        );
    }

    #[test]
    fn patch_overwrites_only_given_keys() {
        let mut reg = ElementRegistry::new();
        let id = rect(&mut reg);
        reg.patch(id, &PropertyBag::new().with("x", 1).with("y", 2))
            .unwrap();
        reg.patch(id, &PropertyBag::new().with("x", 9)).unwrap();
        let props = reg.get(id).unwrap().props();
        assert_eq!(props.number("x"), Some(9.0));
        assert_eq!(props.number("y"), Some(2.0));
    }

    #[test]
    fn remove_detaches_and_forgets() {
        let mut reg = ElementRegistry::new();
        let root = rect(&mut reg);
        let c = rect(&mut reg);
        reg.set_parent(c, root).unwrap();

        let removed = reg.remove(c).unwrap();
        assert_eq!(removed.id(), c);
        assert!(!reg.contains(c));
        assert!(reg.children(root).next().is_none());
        assert_eq!(
            reg.remove(c).unwrap_err(),
            SyncError::UnknownId {
                id: c,
                op: IdUse::Destroy
            }
        );
    }

    #[test]
    fn removing_parent_strands_children() {
        let mut reg = ElementRegistry::new();
        let p = rect(&mut reg);
        let c = rect(&mut reg);
        reg.set_parent(c, p).unwrap();
        reg.remove(p).unwrap();
        assert!(reg.contains(c));
        assert_eq!(reg.parent(c), None);
    }

    #[test]
    fn set_root_moves_flag() {
        let mut reg = ElementRegistry::new();
        let a = rect(&mut reg);
        let b = rect(&mut reg);
        reg.set_root(a).unwrap();
        reg.set_root(b).unwrap();
        assert!(!reg.get(a).unwrap().is_root());
        assert!(reg.get(b).unwrap().is_root());
        assert_eq!(reg.root(), Some(b));
    }

    #[test]
    fn effective_visible_inherits() {
        let mut reg = ElementRegistry::new();
        let p = rect(&mut reg);
        let c = rect(&mut reg);
        reg.set_parent(c, p).unwrap();
        assert!(reg.effective_visible(c));
        reg.patch(p, &PropertyBag::new().with(keys::VISIBLE, false))
            .unwrap();
        assert!(!reg.effective_visible(c));
    }

    #[test]
    fn hidden_root_does_not_hide_scene() {
        let mut reg = ElementRegistry::new();
        let root = rect(&mut reg);
        let c = rect(&mut reg);
        reg.set_root(root).unwrap();
        reg.set_parent(c, root).unwrap();
        reg.patch(root, &PropertyBag::new().with(keys::VISIBLE, false))
            .unwrap();
        assert!(!reg.effective_visible(root));
        assert!(reg.effective_visible(c));
    }

    #[test]
    fn traversal_is_preorder_from_root() {
        let mut reg = ElementRegistry::new();
        let root = rect(&mut reg);
        let a = rect(&mut reg);
        let a1 = rect(&mut reg);
        let b = rect(&mut reg);
        reg.set_root(root).unwrap();
        reg.set_parent(a, root).unwrap();
        reg.set_parent(a1, a).unwrap();
        reg.set_parent(b, root).unwrap();
        assert_eq!(reg.traversal_order(), vec![root, a, a1, b]);
    }
}
