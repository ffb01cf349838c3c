// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph data model.
//!
//! An *element* is a node in the mirrored tree. Each element has:
//!
//! - An identity ([`ElementId`]) allocated by the owning registry's counter.
//! - A kind ([`ElementKind`]) whose type tag lets the renderer construct the
//!   same variant the producer did.
//! - Topology: a parent id and an ordered list of child ids.
//! - A [`PropertyBag`] the protocol moves without interpreting.
//! - A root flag; exactly one element per surface carries it.
//!
//! # Dirty tracking
//!
//! Registry mutations mark dirty channels (see [`dirty`](crate::dirty)):
//!
//! - **PROPERTIES**: local to the patched element.
//! - **VISIBILITY**: propagates to descendants.
//! - **TOPOLOGY**: insert/remove/re-parent; triggers a document re-order.

mod evaluate;
mod id;
mod kind;
mod props;
mod registry;
mod traverse;

pub use evaluate::SceneChanges;
pub use id::{ElementId, ROOT};
pub use kind::{ElementKind, Group, Rectangle};
pub use props::{PropertyBag, Value, keys};
pub use registry::{Element, ElementRegistry};
pub use traverse::{Children, Descendants};
