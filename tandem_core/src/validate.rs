// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry/document consistency check.
//!
//! After every batch a non-live renderer cross-checks its two views of the
//! scene. The checks run in a fixed order and the first failure wins:
//!
//! 1. every element rendered under the mounted root is registered,
//! 2. every registered element resolves to exactly one rendered element,
//! 3. the rendered and registered counts agree.

use crate::document::Document;
use crate::element::ElementRegistry;
use crate::error::ValidationFault;

/// Cross-checks `registry` against `document`.
///
/// # Errors
///
/// Returns the first [`ValidationFault`] found.
pub fn validate(registry: &ElementRegistry, document: &dyn Document) -> Result<(), ValidationFault> {
    let rendered = document.rendered_ids();

    if let Some(&id) = rendered.iter().find(|&&id| !registry.contains(id)) {
        return Err(ValidationFault::OrphanRendered { id });
    }

    for id in registry.ids() {
        let found = document.count_by_id(id);
        if found != 1 {
            return Err(ValidationFault::OrphanRegistry { id, found });
        }
    }

    if rendered.len() != registry.len() {
        return Err(ValidationFault::CountMismatch {
            rendered: rendered.len(),
            registered: registry.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::*;
    use crate::element::{ElementId, PropertyBag, Rectangle};
    use crate::headless::HeadlessDocument;

    /// Registry with a root and one child, rendered and mounted.
    fn synced() -> (ElementRegistry, HeadlessDocument, ElementId, ElementId) {
        let mut reg = ElementRegistry::new();
        let root = reg
            .insert(ElementId(0), Box::new(Rectangle), PropertyBag::new())
            .unwrap();
        let child = reg
            .insert(ElementId(1), Box::new(Rectangle), PropertyBag::new())
            .unwrap();
        reg.set_root(root).unwrap();
        reg.set_parent(child, root).unwrap();
        let mut doc = HeadlessDocument::new();
        let changes = reg.evaluate();
        doc.render(&reg, &changes);
        doc.mount(root);
        (reg, doc, root, child)
    }

    #[test]
    fn consistent_state_passes() {
        let (reg, doc, ..) = synced();
        assert_eq!(validate(&reg, &doc), Ok(()));
    }

    #[test]
    fn rendered_element_missing_from_registry() {
        let (mut reg, doc, _, child) = synced();
        reg.remove(child).unwrap();
        assert_eq!(
            validate(&reg, &doc),
            Err(ValidationFault::OrphanRendered { id: child })
        );
    }

    #[test]
    fn registry_element_never_rendered() {
        let (mut reg, doc, ..) = synced();
        let extra = reg
            .insert(ElementId(2), Box::new(Rectangle), PropertyBag::new())
            .unwrap();
        assert_eq!(
            validate(&reg, &doc),
            Err(ValidationFault::OrphanRegistry {
                id: extra,
                found: 0
            })
        );
    }

    #[test]
    fn rendered_but_detached_is_a_count_mismatch() {
        let (reg, mut doc, _, child) = synced();
        // Still present in the document, but no longer under the root.
        doc.remove_node(child).unwrap();
        doc.inject(child, None);
        assert_eq!(
            validate(&reg, &doc),
            Err(ValidationFault::CountMismatch {
                rendered: 1,
                registered: 2
            })
        );
    }
}
