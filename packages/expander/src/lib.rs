//! # htmlc expander
//!
//! Resolves component tags in a page tree. Any element whose tag is not a
//! native HTML tag is rendered through a [`ComponentResolver`], normalized
//! into a fragment and spliced in its place, recursively, until only native
//! elements remain.
//!
//! Two special tags take part:
//!
//! - `children` marks where the caller's child content goes;
//! - `fragment` wraps output that should splice into the parent without an
//!   element of its own.
//!
//! Output consisting only of head elements is merged into the page `head`.
//!
//! [`TemplateRegistry`] resolves tags against component template files and
//! fills in statically known attribute values.

pub mod component;
pub mod error;
pub mod expand;
pub mod partial;
pub mod registry;


pub use component::{ComponentResolver, Renderer, StaticMarkup};
pub use error::{ExpandError, ExpandResult, RegistryError, RenderError, ResolveError};
pub use expand::{expand, expand_with, ExpandOptions};
pub use partial::{is_truthy, Props, TemplateRenderer, CHILDREN_MARKUP};
pub use registry::{bind_props, TemplateRegistry};
