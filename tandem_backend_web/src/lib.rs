// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for tandem.
//!
//! [`DomDocument`] renders a renderer surface's registry as nested,
//! absolutely positioned `<div>` elements inside a mount point and answers
//! the validator's queries with DOM selectors.
//!
//! ```rust,ignore
//! let mount: HtmlElement = document.get_element_by_id("surface")?.dyn_into()?;
//! let mut surface = Surface::renderer(
//!     SurfaceConfig::debug(bounds),
//!     TypeRegistry::with_builtins(),
//!     Box::new(DomDocument::new(mount)),
//! );
//! surface.execute(&batch)?;
//! ```

#![no_std]

extern crate alloc;

mod dom;

pub use dom::{DomDocument, ELEMENT_CLASS, dom_id};
pub use tandem_core::document::Document;
