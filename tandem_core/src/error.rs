// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fault taxonomy for the synchronization protocol.
//!
//! Every variant of [`SyncError`] means the mirrored state is corrupt or the
//! caller broke the protocol. Nothing in this crate catches or repairs them:
//! they propagate to the caller of
//! [`Surface::execute`](crate::surface::Surface::execute) or
//! [`Surface::validate`](crate::surface::Surface::validate) and halt the
//! batch being applied.

use alloc::string::String;
use core::fmt;

use crate::element::ElementId;
use crate::surface::Role;

/// The operation that required an existing element id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdUse {
    /// A destroy command or producer-side destroy.
    Destroy,
    /// Resolving the `parent` of a command.
    Parent,
    /// Patching properties on the producer.
    Patch,
}

impl IdUse {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
            Self::Parent => "parent lookup",
            Self::Patch => "patch",
        }
    }
}

/// Divergence between the rendered document and the element registry.
///
/// Raised by [`validate`](crate::validate::validate) only when the surface
/// is not live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationFault {
    /// A rendered element under the root has no registry entry.
    OrphanRendered {
        /// Id found in the document.
        id: ElementId,
    },
    /// A registry entry does not resolve to exactly one rendered element.
    OrphanRegistry {
        /// Id found in the registry.
        id: ElementId,
        /// Number of rendered elements carrying that id.
        found: usize,
    },
    /// The rendered tree and the registry hold different element counts.
    CountMismatch {
        /// Elements rendered under the root.
        rendered: usize,
        /// Entries in the registry.
        registered: usize,
    },
}

impl fmt::Display for ValidationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanRendered { id } => {
                write!(f, "rendered element {id} under root not found in registry")
            }
            Self::OrphanRegistry { id, found } => write!(
                f,
                "registry element {id} resolves to {found} rendered elements, expected 1"
            ),
            Self::CountMismatch {
                rendered,
                registered,
            } => write!(
                f,
                "{rendered} elements rendered under root but {registered} registered"
            ),
        }
    }
}

impl core::error::Error for ValidationFault {}

/// Errors raised while producing or applying commands.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncError {
    /// A freshly constructed element did not receive the id its command
    /// declared: producer and renderer are out of step.
    Integrity {
        /// Id carried by the command.
        declared: ElementId,
        /// Id the constructor produced.
        constructed: ElementId,
    },
    /// An operation needed an element that does not exist.
    UnknownId {
        /// The missing id.
        id: ElementId,
        /// What the id was needed for.
        op: IdUse,
    },
    /// An element was materialized under an id that is already live.
    DuplicateId {
        /// The reused id.
        id: ElementId,
    },
    /// Re-parenting would make an element its own ancestor.
    Cycle {
        /// Element being moved.
        child: ElementId,
        /// Requested parent, a descendant of `child`.
        parent: ElementId,
    },
    /// The rendered document disagrees with the registry.
    Validation(ValidationFault),
    /// No constructor is registered for a type tag, or an update that would
    /// create an element carries no tag at all.
    UnknownType {
        /// The element being materialized.
        id: ElementId,
        /// The tag, if the command carried one.
        tag: Option<String>,
    },
    /// The operation is only available to the other role.
    WrongRole {
        /// Role that would have been required.
        expected: Role,
    },
    /// The renderer has applied a batch but never received a root element.
    MissingRoot,
    /// The channel lost a batch, so exactly-once delivery no longer holds.
    Transport {
        /// What the channel reported.
        reason: String,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integrity {
                declared,
                constructed,
            } => write!(
                f,
                "element id mismatch: command declared {declared}, constructor produced {constructed}"
            ),
            Self::UnknownId { id, op } => write!(f, "{}: unknown element {id}", op.as_str()),
            Self::DuplicateId { id } => write!(f, "element {id} already exists"),
            Self::Cycle { child, parent } => {
                write!(f, "cannot move element {child} under its descendant {parent}")
            }
            Self::Validation(fault) => write!(f, "validation failed: {fault}"),
            Self::UnknownType { id, tag: Some(tag) } => {
                write!(f, "no constructor registered for type {tag:?} (element {id})")
            }
            Self::UnknownType { id, tag: None } => {
                write!(f, "cannot create element {id}: update carries no type")
            }
            Self::WrongRole { expected } => {
                write!(f, "operation requires a {expected:?} surface")
            }
            Self::MissingRoot => f.write_str("renderer has no root element"),
            Self::Transport { reason } => write!(f, "batch lost in transport: {reason}"),
        }
    }
}

impl core::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Validation(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<ValidationFault> for SyncError {
    fn from(fault: ValidationFault) -> Self {
        Self::Validation(fault)
    }
}
