// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer-side command application.
//!
//! [`CommandApplier::execute`] walks a [`Batch`] front to back, resolving
//! each command's parent before dispatching it to the update or destroy
//! handler. The first fault stops the walk and is returned; commands before
//! it stay applied, commands after it are never looked at. Re-rendering and
//! validation are the surface's job and run only once the whole batch went
//! through.
//!
//! Updates create lazily: an id the renderer has never seen is materialized
//! from the command's type tag. Destroys do not: an unknown id there means
//! the two sides have diverged.

use crate::command::{Batch, Command, CommandName, CommandOptions};
use crate::element::ElementRegistry;
use crate::error::{IdUse, SyncError};
use crate::factory::TypeRegistry;
use crate::trace::{CommandAppliedEvent, Tracer};

/// Applies batches to a registry using a fixed set of constructors.
#[derive(Clone, Debug, Default)]
pub struct CommandApplier {
    types: TypeRegistry,
}

impl CommandApplier {
    /// Creates an applier that materializes new elements through `types`.
    #[must_use]
    pub fn new(types: TypeRegistry) -> Self {
        Self { types }
    }

    /// Returns the constructor table.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Applies every command in `batch`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first fault raised by a command:
    /// [`SyncError::UnknownId`] for an unresolvable parent or a destroy of a
    /// missing id, [`SyncError::Integrity`] when a constructor stores an
    /// element under an id other than the declared one, and whatever the
    /// registry raises while linking the element in.
    pub fn execute(
        &self,
        registry: &mut ElementRegistry,
        batch: &Batch,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), SyncError> {
        for (index, command) in batch.iter().enumerate() {
            let created = self.apply(registry, command)?;
            tracer.command_applied(&CommandAppliedEvent {
                index,
                name: command.name,
                id: command.id(),
                created,
            });
        }
        Ok(())
    }

    /// Applies one command. Returns `true` if it created an element.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn apply(
        &self,
        registry: &mut ElementRegistry,
        command: &Command,
    ) -> Result<bool, SyncError> {
        let options = &command.options;
        if let Some(parent) = options.parent
            && !registry.contains(parent)
        {
            return Err(SyncError::UnknownId {
                id: parent,
                op: IdUse::Parent,
            });
        }

        match command.name {
            CommandName::Update => self.handle_update(registry, options),
            CommandName::Destroy => {
                registry.remove(options.id)?;
                Ok(false)
            }
        }
    }

    fn handle_update(
        &self,
        registry: &mut ElementRegistry,
        options: &CommandOptions,
    ) -> Result<bool, SyncError> {
        let id = options.id;
        let created = !registry.contains(id);

        if created {
            let constructed = self.types.construct(registry, options)?;
            if constructed != id {
                return Err(SyncError::Integrity {
                    declared: id,
                    constructed,
                });
            }
        } else if !options.props.is_empty() {
            registry.patch(id, &options.props)?;
        }

        if options.root {
            registry.set_root(id)?;
        }
        if let Some(parent) = options.parent {
            registry.set_parent(id, parent)?;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use super::*;
    use crate::element::{ElementId, Rectangle};
    use crate::factory::materialize;

    fn applier() -> CommandApplier {
        CommandApplier::new(TypeRegistry::with_builtins())
    }

    fn run(reg: &mut ElementRegistry, batch: Batch) -> Result<(), SyncError> {
        applier().execute(reg, &batch, &mut Tracer::none())
    }

    fn rect5() -> Command {
        Command::update(
            CommandOptions::new(ElementId(5))
                .typed(Rectangle::TAG)
                .with("x", 10)
                .with("y", 20)
                .with("w", 30)
                .with("h", 40),
        )
    }

    #[test]
    fn update_creates_with_exactly_the_given_properties() {
        let mut reg = ElementRegistry::new();
        run(&mut reg, vec![rect5()]).unwrap();

        assert_eq!(reg.len(), 1);
        let e = reg.get(ElementId(5)).unwrap();
        assert_eq!(e.tag(), "Rectangle");
        let props = e.props();
        assert_eq!(props.len(), 4);
        assert_eq!(props.number("x"), Some(10.0));
        assert_eq!(props.number("y"), Some(20.0));
        assert_eq!(props.number("w"), Some(30.0));
        assert_eq!(props.number("h"), Some(40.0));
    }

    #[test]
    fn update_patches_only_given_keys() {
        let mut reg = ElementRegistry::new();
        run(&mut reg, vec![rect5()]).unwrap();
        run(
            &mut reg,
            vec![Command::update(
                CommandOptions::new(ElementId(5)).with("x", 99),
            )],
        )
        .unwrap();

        let props = reg.get(ElementId(5)).unwrap().props();
        assert_eq!(props.number("x"), Some(99.0));
        assert_eq!(props.number("y"), Some(20.0));
        assert_eq!(props.number("w"), Some(30.0));
        assert_eq!(props.number("h"), Some(40.0));
    }

    #[test]
    fn destroy_twice_is_unknown_id() {
        let mut reg = ElementRegistry::new();
        run(&mut reg, vec![rect5()]).unwrap();
        run(&mut reg, vec![Command::destroy(ElementId(5))]).unwrap();
        assert!(!reg.contains(ElementId(5)));

        assert_eq!(
            run(&mut reg, vec![Command::destroy(ElementId(5))]),
            Err(SyncError::UnknownId {
                id: ElementId(5),
                op: IdUse::Destroy
            })
        );
    }

    #[test]
    fn recreate_within_one_batch_keeps_only_last_properties() {
        let mut reg = ElementRegistry::new();
        let id = ElementId(1);
        run(
            &mut reg,
            vec![
                Command::update(
                    CommandOptions::new(id)
                        .typed(Rectangle::TAG)
                        .with("x", 1)
                        .with("fill", "red"),
                ),
                Command::destroy(id),
                Command::update(CommandOptions::new(id).typed(Rectangle::TAG).with("y", 2)),
            ],
        )
        .unwrap();

        let props = reg.get(id).unwrap().props();
        assert_eq!(props.len(), 1);
        assert_eq!(props.number("y"), Some(2.0));
    }

    #[test]
    fn parent_is_resolved_and_linked() {
        let mut reg = ElementRegistry::new();
        run(
            &mut reg,
            vec![
                Command::update({
                    let mut o = CommandOptions::new(ElementId(0)).typed(Rectangle::TAG);
                    o.root = true;
                    o
                }),
                Command::update(
                    CommandOptions::new(ElementId(1))
                        .typed(Rectangle::TAG)
                        .parent(ElementId(0)),
                ),
            ],
        )
        .unwrap();
        assert_eq!(reg.root(), Some(ElementId(0)));
        assert_eq!(reg.parent(ElementId(1)), Some(ElementId(0)));
    }

    #[test]
    fn unknown_parent_halts_batch() {
        let mut reg = ElementRegistry::new();
        let err = run(
            &mut reg,
            vec![
                Command::update(
                    CommandOptions::new(ElementId(1))
                        .typed(Rectangle::TAG)
                        .parent(ElementId(42)),
                ),
                rect5(),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SyncError::UnknownId {
                id: ElementId(42),
                op: IdUse::Parent
            }
        );
        assert!(reg.is_empty(), "nothing after the fault is applied");
    }

    #[test]
    fn constructor_storing_under_wrong_id_is_integrity_fault() {
        fn counter_constructor(
            registry: &mut ElementRegistry,
            options: &CommandOptions,
        ) -> Result<ElementId, SyncError> {
            let id = registry.allocate_id();
            registry.insert(id, Box::new(Rectangle), options.props.clone())
        }

        let mut types = TypeRegistry::new();
        types.register(Rectangle::TAG, counter_constructor);
        let applier = CommandApplier::new(types);
        let mut reg = ElementRegistry::new();

        let err = applier
            .execute(
                &mut reg,
                &vec![Command::update(
                    CommandOptions::new(ElementId(3)).typed(Rectangle::TAG),
                )],
                &mut Tracer::none(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            SyncError::Integrity {
                declared: ElementId(3),
                constructed: ElementId(0)
            }
        );
    }

    #[test]
    fn update_for_unseen_id_without_type_fails() {
        let mut reg = ElementRegistry::new();
        let err = run(
            &mut reg,
            vec![Command::update(CommandOptions::new(ElementId(2)).with("x", 1))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SyncError::UnknownType {
                id: ElementId(2),
                tag: None
            }
        );
    }

    #[test]
    fn materialize_is_the_builtin_constructor() {
        let mut types = TypeRegistry::new();
        types.register("Box", materialize::<Rectangle>);
        let mut reg = ElementRegistry::new();
        CommandApplier::new(types)
            .execute(
                &mut reg,
                &vec![Command::update(CommandOptions::new(ElementId(0)).typed("Box"))],
                &mut Tracer::none(),
            )
            .unwrap();
        assert_eq!(reg.get(ElementId(0)).unwrap().tag(), "Rectangle");
    }
}
