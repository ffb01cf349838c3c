// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element management.
//!
//! Translates [`ElementRegistry`] state into a tree of positioned `<div>`
//! elements by applying incremental updates from [`SceneChanges`].

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use tandem_core::document::Document;
use tandem_core::element::{ElementId, ElementRegistry, PropertyBag, SceneChanges, keys};
use wasm_bindgen::JsCast as _;
use web_sys::{Element, HtmlElement};

/// Class carried by every element rendered by [`DomDocument`].
pub const ELEMENT_CLASS: &str = "tandem-element";

const ID_PREFIX: &str = "tandem-";

/// Returns the DOM `id` attribute used for `id`.
#[must_use]
pub fn dom_id(id: ElementId) -> String {
    format!("{ID_PREFIX}{id}")
}

fn parse_dom_id(attr: &str) -> Option<ElementId> {
    attr.strip_prefix(ID_PREFIX)?
        .parse::<u32>()
        .ok()
        .map(ElementId)
}

/// Mirrors an [`ElementRegistry`] into live DOM elements under a mount
/// point.
///
/// Each element becomes a `<div class="tandem-element" id="tandem-N">`
/// nested inside its parent's `<div>`. The root's `<div>` is appended to the
/// mount point once, on [`mount`](Document::mount).
pub struct DomDocument {
    container: HtmlElement,
    elements: BTreeMap<ElementId, HtmlElement>,
    mounted: Option<ElementId>,
}

impl core::fmt::Debug for DomDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomDocument")
            .field("container", &"HtmlElement")
            .field("elements_len", &self.elements.len())
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl DomDocument {
    /// Creates a document that mounts into `container`.
    #[must_use]
    pub fn new(container: HtmlElement) -> Self {
        Self {
            container,
            elements: BTreeMap::new(),
            mounted: None,
        }
    }

    /// Returns the mount point.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Returns the DOM element for `id`, if rendered.
    #[must_use]
    pub fn get_element(&self, id: ElementId) -> Option<&HtmlElement> {
        self.elements.get(&id)
    }

    fn create_element(&self, id: ElementId) -> Option<HtmlElement> {
        let Some(doc) = self.container.owner_document() else {
            tracing::error!(%id, "mount point has no owner document");
            return None;
        };
        let el: HtmlElement = match doc.create_element("div") {
            Ok(el) => el.unchecked_into(),
            Err(err) => {
                tracing::error!(%id, ?err, "create_element failed");
                return None;
            }
        };
        el.set_class_name(ELEMENT_CLASS);
        el.set_id(&dom_id(id));
        let s = el.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("box-sizing", "border-box");
        Some(el)
    }
}

impl Document for DomDocument {
    fn render(&mut self, registry: &ElementRegistry, changes: &SceneChanges) {
        // 1. Removals
        for id in &changes.removed {
            if let Some(el) = self.elements.remove(id) {
                el.remove();
            }
        }

        // 2. Additions
        for &id in &changes.added {
            let Some(element) = registry.get(id) else {
                continue;
            };
            if let Some(el) = self.create_element(id) {
                apply_props(&el, element.props());
                set_visible(&el, registry.effective_visible(id));
                self.elements.insert(id, el);
            }
        }

        // 3. Properties
        for &id in &changes.properties {
            if let (Some(el), Some(element)) = (self.elements.get(&id), registry.get(id)) {
                apply_props(el, element.props());
            }
        }

        // 4. Visibility
        for &id in &changes.visibility {
            if let Some(el) = self.elements.get(&id) {
                set_visible(el, registry.effective_visible(id));
            }
        }

        // 5. Topology: re-append in pre-order, which moves existing nodes
        // into their parent and restores sibling order.
        if changes.topology_changed {
            for id in registry.traversal_order() {
                let Some(parent) = registry.parent(id) else {
                    continue;
                };
                if let (Some(p), Some(el)) = (self.elements.get(&parent), self.elements.get(&id)) {
                    if let Err(err) = p.append_child(el) {
                        tracing::error!(%id, %parent, ?err, "append_child failed");
                    }
                }
            }
        }
    }

    fn mount(&mut self, root: ElementId) {
        let Some(el) = self.elements.get(&root) else {
            tracing::error!(%root, "cannot mount an element that was never rendered");
            return;
        };
        if let Err(err) = self.container.append_child(el) {
            tracing::error!(%root, ?err, "failed to attach root to mount point");
            return;
        }
        self.mounted = Some(root);
    }

    fn mounted_root(&self) -> Option<ElementId> {
        self.mounted
    }

    fn rendered_ids(&self) -> Vec<ElementId> {
        let Some(root) = self.mounted else {
            return Vec::new();
        };
        let Some(root_el) = self.elements.get(&root) else {
            return Vec::new();
        };
        let mut ids = Vec::new();
        if let Some(id) = parse_dom_id(&root_el.id()) {
            ids.push(id);
        }
        let Ok(list) = root_el.query_selector_all(&format!(".{ELEMENT_CLASS}")) else {
            return ids;
        };
        for i in 0..list.length() {
            let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            match parse_dom_id(&el.id()) {
                Some(id) => ids.push(id),
                None => tracing::warn!(attr = %el.id(), "rendered element with foreign id"),
            }
        }
        ids
    }

    fn count_by_id(&self, id: ElementId) -> usize {
        let Some(doc) = self.container.owner_document() else {
            return 0;
        };
        match doc.query_selector_all(&format!("[id='{}']", dom_id(id))) {
            Ok(list) => list.length() as usize,
            Err(err) => {
                tracing::error!(%id, ?err, "query_selector_all failed");
                0
            }
        }
    }
}

/// Writes geometry and paint properties as inline CSS.
fn apply_props(el: &HtmlElement, props: &PropertyBag) {
    let s = el.style();
    for (key, css) in [
        (keys::X, "left"),
        (keys::Y, "top"),
        (keys::W, "width"),
        (keys::H, "height"),
    ] {
        if let Some(v) = props.number(key) {
            let _ = s.set_property(css, &format!("{v}px"));
        }
    }
    if let Some(width) = props.number(keys::STROKE_WIDTH) {
        let _ = s.set_property("border-width", &format!("{width}px"));
        let _ = s.set_property("border-style", if width > 0.0 { "solid" } else { "none" });
    }
    if let Some(fill) = props.get("fill").and_then(|v| v.as_str()) {
        let _ = s.set_property("background-color", fill);
    }
    if let Some(stroke) = props.get("stroke").and_then(|v| v.as_str()) {
        let _ = s.set_property("border-color", stroke);
    }
}

/// Uses `visibility` rather than `display` so a hidden root backdrop does
/// not take the scene nested in it along.
fn set_visible(el: &HtmlElement, visible: bool) {
    let value = if visible { "visible" } else { "hidden" };
    let _ = el.style().set_property("visibility", value);
}
