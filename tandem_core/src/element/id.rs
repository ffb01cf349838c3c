// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity.

use core::fmt;

/// Identity of an element, shared by the producer and renderer copies.
///
/// Ids are handed out by a per-surface counter that starts at zero whenever a
/// [`Surface`](crate::surface::Surface) is constructed. Because both sides
/// start from the same baseline and apply the same commands in the same
/// order, equal ids name the same logical element in both contexts.
///
/// Unlike a generational slot handle, an id is never recycled by the
/// counter; a destroyed id only comes back if a command explicitly
/// recreates it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementId(pub u32);

/// Id of the root element of every surface.
pub const ROOT: ElementId = ElementId(0);

impl ElementId {
    /// Returns the raw counter value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for ElementId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
