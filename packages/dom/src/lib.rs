pub mod error;
pub mod html;
pub mod node;
pub mod normalize;
pub mod render;
pub mod tags;

pub use error::{DomError, DomResult};
pub use html::{parse_document, parse_fragment, tokenize, HtmlFragment, HtmlToken};
pub use indextree::NodeId;
pub use node::{Attributes, Dom, NodeData, NodeKind};
pub use normalize::{normalize, rewrite_self_closing};
pub use render::{escape_markup, render, render_into};
pub use tags::{is_native, is_target, CHILDREN_TAG, FRAGMENT_TAG};
