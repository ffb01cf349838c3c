// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use tandem_core::element::{ElementId, ElementRegistry};

/// One way a renderer registry differs from its producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Divergence {
    /// The producer has an element the renderer lacks.
    Missing(ElementId),
    /// The renderer has an element the producer does not.
    Extra(ElementId),
    /// The two sides disagree on the root.
    Root {
        /// Producer root.
        producer: Option<ElementId>,
        /// Renderer root.
        renderer: Option<ElementId>,
    },
    /// Same id, different type tag.
    Tag {
        /// Element.
        id: ElementId,
        /// Producer tag.
        producer: &'static str,
        /// Renderer tag.
        renderer: &'static str,
    },
    /// Same id, different parent.
    Parent {
        /// Element.
        id: ElementId,
        /// Producer parent.
        producer: Option<ElementId>,
        /// Renderer parent.
        renderer: Option<ElementId>,
    },
    /// Same id, different child order.
    Children {
        /// Element.
        id: ElementId,
    },
    /// A transferable property differs.
    Property {
        /// Element.
        id: ElementId,
        /// Property key.
        key: String,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(id) => write!(f, "element {id} missing on renderer"),
            Self::Extra(id) => write!(f, "element {id} only exists on renderer"),
            Self::Root { producer, renderer } => {
                write!(f, "root differs: producer {producer:?}, renderer {renderer:?}")
            }
            Self::Tag {
                id,
                producer,
                renderer,
            } => write!(f, "element {id} is {producer} on producer, {renderer} on renderer"),
            Self::Parent {
                id,
                producer,
                renderer,
            } => write!(
                f,
                "element {id} parent differs: producer {producer:?}, renderer {renderer:?}"
            ),
            Self::Children { id } => write!(f, "element {id} children differ"),
            Self::Property { id, key } => write!(f, "element {id} property {key:?} differs"),
        }
    }
}

/// Compares a renderer registry against its producer.
///
/// Non-transferable keys are ignored, since they never cross the channel.
#[must_use]
pub fn diff(producer: &ElementRegistry, renderer: &ElementRegistry) -> Vec<Divergence> {
    let mut out = Vec::new();

    if producer.root() != renderer.root() {
        out.push(Divergence::Root {
            producer: producer.root(),
            renderer: renderer.root(),
        });
    }

    for p in producer.iter() {
        let id = p.id();
        let Some(r) = renderer.get(id) else {
            out.push(Divergence::Missing(id));
            continue;
        };
        if p.tag() != r.tag() {
            out.push(Divergence::Tag {
                id,
                producer: p.tag(),
                renderer: r.tag(),
            });
        }
        if p.parent() != r.parent() {
            out.push(Divergence::Parent {
                id,
                producer: p.parent(),
                renderer: r.parent(),
            });
        }
        if p.children() != r.children() {
            out.push(Divergence::Children { id });
        }

        let (pp, rp) = (p.props().transferable(), r.props().transferable());
        let keys = pp.keys().chain(rp.keys().filter(|k| !pp.contains_key(k)));
        for key in keys {
            if pp.get(key) != rp.get(key) {
                out.push(Divergence::Property {
                    id,
                    key: key.clone(),
                });
            }
        }
    }

    out.extend(
        renderer
            .ids()
            .filter(|&id| !producer.contains(id))
            .map(Divergence::Extra),
    );
    out
}

/// Panics with every divergence listed if the registries differ.
#[track_caller]
pub fn assert_mirrored(producer: &ElementRegistry, renderer: &ElementRegistry) {
    let found = diff(producer, renderer);
    if !found.is_empty() {
        let lines: Vec<String> = found.iter().map(ToString::to_string).collect();
        panic!("registries diverged:\n  {}", lines.join("\n  "));
    }
}
