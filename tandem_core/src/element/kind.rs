// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element variants.
//!
//! Concrete shapes, their geometry and their drawing live outside this
//! crate. The protocol only needs to know an element's type tag (so the
//! renderer can materialize the same variant) and the properties it starts
//! with before the command's own options are applied.

use core::fmt;

use super::props::{PropertyBag, keys};

/// A constructible element variant.
///
/// Implementations are registered by tag in a
/// [`TypeRegistry`](crate::factory::TypeRegistry) on both sides of the
/// channel.
pub trait ElementKind: fmt::Debug {
    /// Type tag carried in the `type` field of update commands.
    fn tag(&self) -> &'static str;

    /// Properties every new element of this kind starts with.
    ///
    /// Options supplied at construction are merged on top.
    fn default_properties(&self) -> PropertyBag {
        PropertyBag::new()
    }
}

/// Axis-aligned rectangle. Also the kind of every surface root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rectangle;

impl Rectangle {
    /// Type tag for rectangles.
    pub const TAG: &'static str = "Rectangle";
}

impl ElementKind for Rectangle {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn default_properties(&self) -> PropertyBag {
        PropertyBag::new()
            .with(keys::X, 0)
            .with(keys::Y, 0)
            .with(keys::W, 0)
            .with(keys::H, 0)
            .with(keys::VISIBLE, true)
            .with(keys::STROKE_WIDTH, 1)
    }
}

/// Invisible grouping node with no geometry of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Group;

impl Group {
    /// Type tag for groups.
    pub const TAG: &'static str = "Group";
}

impl ElementKind for Group {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn default_properties(&self) -> PropertyBag {
        PropertyBag::new().with(keys::VISIBLE, true)
    }
}
