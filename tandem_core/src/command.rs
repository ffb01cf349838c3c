// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Commands and batches: the wire model between producer and renderer.
//!
//! With the `serde` feature, a [`Batch`] serializes to the shape both sides
//! agree on:
//!
//! ```json
//! [
//!   { "name": "updateElement",
//!     "options": { "id": 0, "type": "Rectangle", "root": true, "x": 0, "w": 800 } },
//!   { "name": "destroyElement", "options": { "id": 3 } }
//! ]
//! ```
//!
//! Options never carry an element reference, only ids, so serializing a
//! command never drags the ancestor chain along with it.

use alloc::string::String;
use alloc::vec::Vec;

use crate::element::{ElementId, PropertyBag, Value};

/// The two mutations the producer can send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandName {
    /// Create the element if unseen, otherwise patch its properties.
    #[cfg_attr(feature = "serde", serde(rename = "updateElement"))]
    Update,
    /// Remove the element from the tree and the registry.
    #[cfg_attr(feature = "serde", serde(rename = "destroyElement"))]
    Destroy,
}

impl CommandName {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "updateElement",
            Self::Destroy => "destroyElement",
        }
    }
}

/// Options handed to a lifecycle hook, before the id is stamped.
///
/// This is what element mutation code produces: a type tag when the element
/// is new, the root flag for the surface root, a parent id when the element
/// is (re-)attached, and the properties that changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementOptions {
    /// Type tag; set when the element is created.
    pub type_tag: Option<String>,
    /// Marks the surface root.
    pub root: bool,
    /// New parent, by id.
    pub parent: Option<ElementId>,
    /// Changed properties.
    pub props: PropertyBag,
}

impl ElementOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options carrying only `props`.
    #[must_use]
    pub fn from_props(props: PropertyBag) -> Self {
        Self {
            props,
            ..Self::default()
        }
    }

    /// Builder-style property insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Builder-style parent.
    #[must_use]
    pub fn parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// The payload of a [`Command`]: the target id plus whatever changed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandOptions {
    /// Target element.
    pub id: ElementId,
    /// Type tag, present when the update may create the element.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", default, skip_serializing_if = "Option::is_none")
    )]
    pub type_tag: Option<String>,
    /// Marks the surface root.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "core::ops::Not::not")
    )]
    pub root: bool,
    /// Parent id.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub parent: Option<ElementId>,
    /// Every other key.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub props: PropertyBag,
}

impl CommandOptions {
    /// Creates options addressing `id` with nothing else set.
    #[must_use]
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            type_tag: None,
            root: false,
            parent: None,
            props: PropertyBag::new(),
        }
    }

    /// Builds transferable options for `id`: the non-transferable keys are
    /// stripped and the rest is cloned.
    #[must_use]
    pub fn stamp(id: ElementId, options: &ElementOptions) -> Self {
        Self {
            id,
            type_tag: options.type_tag.clone(),
            root: options.root,
            parent: options.parent,
            props: options.props.transferable(),
        }
    }

    /// Folds a later update for the same id into this one; keys present in
    /// `later` win.
    pub fn merge(&mut self, later: &Self) {
        if later.type_tag.is_some() {
            self.type_tag.clone_from(&later.type_tag);
        }
        self.root |= later.root;
        if later.parent.is_some() {
            self.parent = later.parent;
        }
        self.props.merge(&later.props);
    }

    /// Builder-style property insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Builder-style type tag.
    #[must_use]
    pub fn typed(mut self, tag: &str) -> Self {
        self.type_tag = Some(String::from(tag));
        self
    }

    /// Builder-style parent.
    #[must_use]
    pub fn parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// One serialized mutation targeting a single element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    /// Which mutation.
    pub name: CommandName,
    /// Target id and payload.
    pub options: CommandOptions,
}

impl Command {
    /// Creates an update command.
    #[must_use]
    pub fn update(options: CommandOptions) -> Self {
        Self {
            name: CommandName::Update,
            options,
        }
    }

    /// Creates a destroy command for `id`.
    #[must_use]
    pub fn destroy(id: ElementId) -> Self {
        Self {
            name: CommandName::Destroy,
            options: CommandOptions::new(id),
        }
    }

    /// Returns the target id.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.options.id
    }
}

/// Every command buffered since the previous flush, in order.
pub type Batch = Vec<Command>;
