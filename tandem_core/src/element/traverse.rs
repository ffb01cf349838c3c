// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec;
use alloc::vec::Vec;
use core::iter::Copied;
use core::slice;

use super::id::ElementId;
use super::registry::ElementRegistry;

/// An iterator over the direct children of an element.
///
/// Created by [`ElementRegistry::children`].
#[derive(Debug)]
pub struct Children<'a> {
    inner: Copied<slice::Iter<'a, ElementId>>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(children: &'a [ElementId]) -> Self {
        Self {
            inner: children.iter().copied(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A pre-order iterator over an element and its descendants.
///
/// Created by [`ElementRegistry::descendants`]. Yields nothing if the start
/// id is not live.
#[derive(Debug)]
pub struct Descendants<'a> {
    registry: &'a ElementRegistry,
    stack: Vec<ElementId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(registry: &'a ElementRegistry, start: ElementId) -> Self {
        let stack = if registry.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { registry, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let id = self.stack.pop()?;
        if let Some(e) = self.registry.get(id) {
            // Push in reverse so the first child is visited first.
            self.stack.extend(e.children().iter().rev().copied());
        }
        Some(id)
    }
}
