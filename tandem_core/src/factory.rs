// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-tag → constructor registry.
//!
//! The renderer materializes elements it has never seen from nothing but the
//! `type` string of an update command. Rather than looking names up at
//! runtime, each side registers the variants it knows, and construction goes
//! through this table. Both sides should register the same set.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use crate::command::CommandOptions;
use crate::element::{ElementId, ElementKind, ElementRegistry, Group, Rectangle};
use crate::error::SyncError;

/// Builds an element from update options and files it in the registry.
///
/// Returns the id the element was stored under. A well-behaved constructor
/// stores the element under `options.id`; the applier treats anything else
/// as producer/renderer desynchronization.
pub type Constructor = fn(&mut ElementRegistry, &CommandOptions) -> Result<ElementId, SyncError>;

/// Standard constructor for a default-constructible kind: stores a fresh `K`
/// under the declared id with the command's properties.
///
/// # Errors
///
/// Returns [`SyncError::DuplicateId`] if the declared id is already live.
pub fn materialize<K: ElementKind + Default + 'static>(
    registry: &mut ElementRegistry,
    options: &CommandOptions,
) -> Result<ElementId, SyncError> {
    registry.insert(options.id, Box::new(K::default()), options.props.clone())
}

/// Mapping from type tag to [`Constructor`].
#[derive(Clone, Default)]
pub struct TypeRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in kinds ([`Rectangle`], [`Group`]).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut types = Self::new();
        types.register_kind::<Rectangle>();
        types.register_kind::<Group>();
        types
    }

    /// Registers `constructor` for `tag`, returning the one it replaces.
    pub fn register(&mut self, tag: &str, constructor: Constructor) -> Option<Constructor> {
        self.constructors.insert(String::from(tag), constructor)
    }

    /// Registers [`materialize::<K>`](materialize) under `K`'s tag.
    pub fn register_kind<K: ElementKind + Default + 'static>(&mut self) -> Option<Constructor> {
        let tag = K::default().tag();
        self.register(tag, materialize::<K>)
    }

    /// Returns whether `tag` has a constructor.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Iterates registered tags in order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.constructors.keys().map(String::as_str)
    }

    /// Looks up the constructor named by `options.type_tag` and runs it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownType`] if the options carry no tag or the
    /// tag is unregistered, or whatever the constructor returns.
    pub fn construct(
        &self,
        registry: &mut ElementRegistry,
        options: &CommandOptions,
    ) -> Result<ElementId, SyncError> {
        let Some(tag) = options.type_tag.as_deref() else {
            return Err(SyncError::UnknownType {
                id: options.id,
                tag: None,
            });
        };
        let Some(constructor) = self.constructors.get(tag) else {
            return Err(SyncError::UnknownType {
                id: options.id,
                tag: Some(String::from(tag)),
            });
        };
        constructor(registry, options)
    }
}
