// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`Document`] for renderers without a real display.
//!
//! [`HeadlessDocument`] keeps one [`RenderedNode`] per element, linked into
//! a tree that mirrors the registry, and applies [`SceneChanges`]
//! incrementally exactly as a DOM backend would. It is what servers,
//! benchmarks and tests render into.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use crate::document::Document;
use crate::element::{ElementId, ElementRegistry, PropertyBag, SceneChanges};

/// A rendered element.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedNode {
    /// Type tag of the element.
    pub tag: &'static str,
    /// Rendered parent.
    pub parent: Option<ElementId>,
    /// Rendered children, in order.
    pub children: Vec<ElementId>,
    /// Properties as of the last render.
    pub props: PropertyBag,
    /// Effective visibility as of the last render.
    pub visible: bool,
}

/// An in-memory rendered tree.
#[derive(Clone, Debug, Default)]
pub struct HeadlessDocument {
    nodes: BTreeMap<ElementId, RenderedNode>,
    mounted: Option<ElementId>,
    renders: usize,
}

impl HeadlessDocument {
    /// Creates an empty, unmounted document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered node for `id`.
    #[must_use]
    pub fn node(&self, id: ElementId) -> Option<&RenderedNode> {
        self.nodes.get(&id)
    }

    /// Number of rendered nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of [`render`](Document::render) calls so far.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Adds a rendered node the registry knows nothing about, as a leaked
    /// element would be.
    pub fn inject(&mut self, id: ElementId, parent: Option<ElementId>) {
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }
        self.nodes.insert(
            id,
            RenderedNode {
                tag: "",
                parent,
                children: Vec::new(),
                props: PropertyBag::new(),
                visible: true,
            },
        );
    }

    /// Drops a rendered node without touching the registry.
    pub fn remove_node(&mut self, id: ElementId) -> Option<RenderedNode> {
        let node = self.nodes.remove(&id)?;
        if let Some(p) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|&c| c != id);
        }
        Some(node)
    }
}

impl Document for HeadlessDocument {
    fn render(&mut self, registry: &ElementRegistry, changes: &SceneChanges) {
        self.renders += 1;

        // 1. Removals
        for &id in &changes.removed {
            let _ = self.remove_node(id);
        }

        // 2. Additions
        for &id in &changes.added {
            if let Some(e) = registry.get(id) {
                self.nodes.insert(
                    id,
                    RenderedNode {
                        tag: e.tag(),
                        parent: None,
                        children: Vec::new(),
                        props: e.props().clone(),
                        visible: registry.effective_visible(id),
                    },
                );
            }
        }

        // 3. Properties
        for &id in &changes.properties {
            if let (Some(node), Some(e)) = (self.nodes.get_mut(&id), registry.get(id)) {
                node.props.clone_from(e.props());
            }
        }

        // 4. Visibility
        for &id in &changes.visibility {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.visible = registry.effective_visible(id);
            }
        }

        // 5. Topology
        if changes.topology_changed {
            for (id, node) in &mut self.nodes {
                if let Some(e) = registry.get(*id) {
                    node.parent = e.parent();
                    node.children = e.children().to_vec();
                }
            }
        }
    }

    fn mount(&mut self, root: ElementId) {
        self.mounted = Some(root);
    }

    fn mounted_root(&self) -> Option<ElementId> {
        self.mounted
    }

    fn rendered_ids(&self) -> Vec<ElementId> {
        let Some(root) = self.mounted.filter(|r| self.nodes.contains_key(r)) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn count_by_id(&self, id: ElementId) -> usize {
        usize::from(self.nodes.contains_key(&id))
    }
}
