// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface bootstrap for the two roles.
//!
//! A [`Surface`] is created once per context with a fixed [`Role`]:
//!
//! - **Producer**: resets its registry, creates the root rectangle covering
//!   the surface bounds, and owns the [`CommandBuffer`]. Scene code mutates
//!   elements through [`create`](Surface::create), [`set`](Surface::set) and
//!   [`destroy`](Surface::destroy), which feed the lifecycle hooks.
//! - **Renderer**: owns the [`CommandApplier`] and a [`Document`]. It never
//!   buffers; [`execute`](Surface::execute) applies a batch, re-renders, and
//!   (unless live) validates.
//!
//! Each surface owns its registry, so several surfaces can coexist in one
//! process without sharing an id namespace.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::apply::CommandApplier;
use crate::buffer::CommandBuffer;
use crate::command::{Batch, Command, CommandName, CommandOptions, ElementOptions};
use crate::document::Document;
use crate::element::{ElementId, ElementRegistry, PropertyBag, Rectangle, SceneChanges, keys};
use crate::error::{IdUse, SyncError};
use crate::factory::TypeRegistry;
use crate::trace::{BatchAppliedEvent, BatchFlushedEvent, Tracer, ValidatedEvent};
use crate::validate::validate;

/// Which side of the channel a surface is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Authors the scene and emits commands.
    Producer,
    /// Mirrors the scene into a document.
    Renderer,
}

/// Surface configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Area covered by the root element.
    pub bounds: Rect,
    /// Production mode: skips the consistency validator.
    pub live: bool,
}

impl SurfaceConfig {
    /// Development configuration: validation after every batch.
    #[must_use]
    pub const fn debug(bounds: Rect) -> Self {
        Self {
            bounds,
            live: false,
        }
    }

    /// Production configuration: no validation.
    #[must_use]
    pub const fn live(bounds: Rect) -> Self {
        Self { bounds, live: true }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::debug(Rect::ZERO)
    }
}

enum RoleState {
    Producer {
        buffer: CommandBuffer,
        types: TypeRegistry,
    },
    Renderer {
        applier: CommandApplier,
        document: Box<dyn Document>,
    },
}

/// One end of a mirrored scene.
pub struct Surface {
    config: SurfaceConfig,
    registry: ElementRegistry,
    changes: SceneChanges,
    state: RoleState,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("role", &self.role())
            .field("config", &self.config)
            .field("elements", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Creates a producer surface and its root element.
    ///
    /// The root is an invisible [`Rectangle`] spanning `config.bounds` with
    /// no stroke; its creation is the first buffered command.
    ///
    /// # Errors
    ///
    /// Returns whatever the registered [`Rectangle`] constructor raises.
    pub fn producer(config: SurfaceConfig, types: TypeRegistry) -> Result<Self, SyncError> {
        let mut surface = Self {
            config,
            registry: ElementRegistry::new(),
            changes: SceneChanges::default(),
            state: RoleState::Producer {
                buffer: CommandBuffer::new(),
                types,
            },
        };

        let b = config.bounds;
        let root = ElementOptions {
            root: true,
            props: PropertyBag::new()
                .with(keys::VISIBLE, false)
                .with(keys::X, b.x0)
                .with(keys::Y, b.y0)
                .with(keys::W, b.width())
                .with(keys::H, b.height())
                .with(keys::STROKE_WIDTH, 0),
            ..ElementOptions::default()
        };
        surface.create(Rectangle::TAG, root)?;
        Ok(surface)
    }

    /// Creates a renderer surface drawing into `document`.
    #[must_use]
    pub fn renderer(
        config: SurfaceConfig,
        types: TypeRegistry,
        document: Box<dyn Document>,
    ) -> Self {
        Self {
            config,
            registry: ElementRegistry::new(),
            changes: SceneChanges::default(),
            state: RoleState::Renderer {
                applier: CommandApplier::new(types),
                document,
            },
        }
    }

    // -- Accessors --

    /// Returns the surface's role.
    #[must_use]
    pub fn role(&self) -> Role {
        match self.state {
            RoleState::Producer { .. } => Role::Producer,
            RoleState::Renderer { .. } => Role::Renderer,
        }
    }

    /// Returns the configuration the surface was built with.
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Returns the area covered by the root element.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.config.bounds
    }

    /// Returns whether validation is disabled.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.config.live
    }

    /// Returns the root element id, once there is one.
    #[must_use]
    pub fn root(&self) -> Option<ElementId> {
        self.registry.root()
    }

    /// Returns the element registry.
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Returns the element registry mutably.
    ///
    /// Changes made here bypass the command buffer and will not reach the
    /// other side.
    pub fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    /// Returns the renderer's document, or `None` on a producer.
    #[must_use]
    pub fn document(&self) -> Option<&dyn Document> {
        match &self.state {
            RoleState::Renderer { document, .. } => Some(&**document),
            RoleState::Producer { .. } => None,
        }
    }

    /// Returns the commands buffered since the last flush. Always empty on
    /// a renderer.
    #[must_use]
    pub fn pending(&self) -> &[Command] {
        match &self.state {
            RoleState::Producer { buffer, .. } => buffer.pending(),
            RoleState::Renderer { .. } => &[],
        }
    }

    // -- Lifecycle hooks --

    /// Records that `id` changed. No-op on a renderer.
    pub fn element_updated(&mut self, id: ElementId, options: &ElementOptions, tracer: &mut Tracer<'_>) {
        if let RoleState::Producer { buffer, .. } = &mut self.state {
            buffer.add(CommandName::Update, id, options, tracer);
        }
    }

    /// Records that `id` was destroyed. No-op on a renderer.
    pub fn element_destroyed(&mut self, id: ElementId, tracer: &mut Tracer<'_>) {
        if let RoleState::Producer { buffer, .. } = &mut self.state {
            buffer.add(CommandName::Destroy, id, &ElementOptions::new(), tracer);
        }
    }

    // -- Producer API --

    /// Creates an element of type `tag`.
    ///
    /// The kind's default properties are applied first, then
    /// `options.props`. Unless `options.root` is set, the element is
    /// attached to `options.parent`, or to the root when no parent is
    /// given.
    ///
    /// # Errors
    ///
    /// [`SyncError::WrongRole`] on a renderer, [`SyncError::UnknownType`]
    /// for an unregistered tag, [`SyncError::UnknownId`] for a missing
    /// parent.
    pub fn create(&mut self, tag: &str, options: ElementOptions) -> Result<ElementId, SyncError> {
        self.create_traced(tag, options, &mut Tracer::none())
    }

    /// Like [`create`](Self::create), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_traced(
        &mut self,
        tag: &str,
        mut options: ElementOptions,
        tracer: &mut Tracer<'_>,
    ) -> Result<ElementId, SyncError> {
        let RoleState::Producer { types, .. } = &self.state else {
            return Err(SyncError::WrongRole {
                expected: Role::Producer,
            });
        };
        if let Some(parent) = options.parent
            && !self.registry.contains(parent)
        {
            return Err(SyncError::UnknownId {
                id: parent,
                op: IdUse::Parent,
            });
        }

        let declared = self.registry.peek_next_id();
        let mut seed = CommandOptions::new(declared).typed(tag);
        seed.props.clone_from(&options.props);
        let id = types.construct(&mut self.registry, &seed)?;
        if id != declared {
            return Err(SyncError::Integrity {
                declared,
                constructed: id,
            });
        }

        let mut props = self
            .registry
            .get(id)
            .map(|e| e.kind().default_properties())
            .unwrap_or_default();
        props.merge(&options.props);
        self.registry.patch(id, &props)?;

        if options.root {
            self.registry.set_root(id)?;
            options.parent = None;
        } else {
            options.parent = options.parent.or(self.registry.root());
            if let Some(parent) = options.parent {
                self.registry.set_parent(id, parent)?;
            }
        }

        options.type_tag = Some(tag.into());
        options.props = props;
        self.element_updated(id, &options, tracer);
        Ok(id)
    }

    /// Patches `options.props` onto `id` and, if `options.parent` is set,
    /// moves it there.
    ///
    /// # Errors
    ///
    /// [`SyncError::WrongRole`] on a renderer, [`SyncError::UnknownId`] for
    /// a missing element or parent, [`SyncError::Cycle`] for an impossible
    /// move.
    pub fn set(&mut self, id: ElementId, options: ElementOptions) -> Result<(), SyncError> {
        self.set_traced(id, options, &mut Tracer::none())
    }

    /// Like [`set`](Self::set), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn set_traced(
        &mut self,
        id: ElementId,
        mut options: ElementOptions,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), SyncError> {
        self.require(Role::Producer)?;
        self.registry.patch(id, &options.props)?;
        if let Some(parent) = options.parent {
            self.registry.set_parent(id, parent)?;
        }
        options.type_tag = None;
        options.root = false;
        self.element_updated(id, &options, tracer);
        Ok(())
    }

    /// Destroys `id` and everything below it, children first. Each element
    /// gets its own destroy command.
    ///
    /// # Errors
    ///
    /// [`SyncError::WrongRole`] on a renderer, [`SyncError::UnknownId`] if
    /// `id` is not live.
    pub fn destroy(&mut self, id: ElementId) -> Result<(), SyncError> {
        self.destroy_traced(id, &mut Tracer::none())
    }

    /// Like [`destroy`](Self::destroy), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`destroy`](Self::destroy).
    pub fn destroy_traced(&mut self, id: ElementId, tracer: &mut Tracer<'_>) -> Result<(), SyncError> {
        self.require(Role::Producer)?;
        if !self.registry.contains(id) {
            return Err(SyncError::UnknownId {
                id,
                op: IdUse::Destroy,
            });
        }
        let doomed: Vec<ElementId> = self.registry.descendants(id).collect();
        for &victim in doomed.iter().rev() {
            self.registry.remove(victim)?;
            self.element_destroyed(victim, tracer);
        }
        Ok(())
    }

    /// Returns every buffered command and empties the buffer.
    ///
    /// # Errors
    ///
    /// [`SyncError::WrongRole`] on a renderer.
    pub fn flush_commands(&mut self) -> Result<Batch, SyncError> {
        self.flush_traced(&mut Tracer::none())
    }

    /// Like [`flush_commands`](Self::flush_commands), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`flush_commands`](Self::flush_commands).
    pub fn flush_traced(&mut self, tracer: &mut Tracer<'_>) -> Result<Batch, SyncError> {
        let RoleState::Producer { buffer, .. } = &mut self.state else {
            return Err(SyncError::WrongRole {
                expected: Role::Producer,
            });
        };
        let batch = buffer.flush();
        // The producer renders nothing; drop accumulated changes.
        self.registry.evaluate_into(&mut self.changes);
        tracer.batch_flushed(&BatchFlushedEvent {
            commands: batch.len(),
        });
        Ok(batch)
    }

    // -- Renderer API --

    /// Applies `batch`, re-renders, then validates unless live.
    ///
    /// # Errors
    ///
    /// [`SyncError::WrongRole`] on a producer; otherwise the first fault
    /// from application, rendering or validation.
    pub fn execute(&mut self, batch: &Batch) -> Result<(), SyncError> {
        self.execute_traced(batch, &mut Tracer::none())
    }

    /// Like [`execute`](Self::execute), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn execute_traced(&mut self, batch: &Batch, tracer: &mut Tracer<'_>) -> Result<(), SyncError> {
        let RoleState::Renderer { applier, .. } = &self.state else {
            return Err(SyncError::WrongRole {
                expected: Role::Renderer,
            });
        };
        applier.execute(&mut self.registry, batch, tracer)?;
        self.update()?;
        tracer.batch_applied(&BatchAppliedEvent {
            commands: batch.len(),
            elements: self.registry.len(),
        });

        self.validate()?;
        tracer.validated(&ValidatedEvent {
            elements: self.registry.len(),
            skipped: self.config.live,
        });
        Ok(())
    }

    /// Renders pending registry changes and mounts the root the first time
    /// there is one.
    ///
    /// # Errors
    ///
    /// [`SyncError::WrongRole`] on a producer, [`SyncError::MissingRoot`]
    /// if elements exist but none of them was ever marked as root.
    pub fn update(&mut self) -> Result<(), SyncError> {
        let RoleState::Renderer { document, .. } = &mut self.state else {
            return Err(SyncError::WrongRole {
                expected: Role::Renderer,
            });
        };
        self.registry.evaluate_into(&mut self.changes);
        document.render(&self.registry, &self.changes);

        if document.mounted_root().is_none() {
            match self.registry.root() {
                Some(root) => document.mount(root),
                None if self.registry.is_empty() => {}
                None => return Err(SyncError::MissingRoot),
            }
        }
        Ok(())
    }

    /// Cross-checks the registry against the document. Does nothing when
    /// the surface is live.
    ///
    /// # Errors
    ///
    /// [`SyncError::WrongRole`] on a producer, [`SyncError::Validation`]
    /// naming the failed check.
    pub fn validate(&self) -> Result<(), SyncError> {
        let RoleState::Renderer { document, .. } = &self.state else {
            return Err(SyncError::WrongRole {
                expected: Role::Renderer,
            });
        };
        if self.config.live {
            return Ok(());
        }
        validate(&self.registry, &**document)?;
        Ok(())
    }

    fn require(&self, role: Role) -> Result<(), SyncError> {
        if self.role() == role {
            Ok(())
        } else {
            Err(SyncError::WrongRole { expected: role })
        }
    }
}
