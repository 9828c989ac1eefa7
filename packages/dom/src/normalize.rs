//! Fragment normalization: turn raw component or page markup into a single
//! root node.

use crate::error::{DomError, DomResult};
use crate::html::{parse_document, parse_fragment};
use crate::node::{Attributes, Dom};
use indextree::NodeId;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn self_closing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<([A-Za-z][A-Za-z0-9-]*)([^>]*)/>").expect("self-closing pattern is valid")
    })
}

/// Rewrite every `<tag attrs/>` into `<tag attrs></tag>`
pub fn rewrite_self_closing(source: &str) -> Cow<'_, str> {
    self_closing_pattern().replace_all(source, "<$1$2></$1>")
}

/// Normalize markup into one root node of `dom`.
///
/// Template text with named definitions is reduced to its first definition.
/// Otherwise the root is chosen from the parsed `head` and `body`:
/// a full document when both have content, the `head` element when only
/// it does, the single body child, or a `div` adopting several body
/// children.
pub fn normalize(dom: &mut Dom, source: &str) -> DomResult<NodeId> {
    let source = rewrite_self_closing(source);
    let set = htmlc_parser::parse(&source)?;

    if let Some(definition) = set.first_definition() {
        tracing::debug!(definition = %definition.name, "normalizing first definition");
        let content = htmlc_parser::serialize(&definition.body);
        return normalize(dom, &content);
    }

    select_root(dom, &source)
}

fn select_root(dom: &mut Dom, source: &str) -> DomResult<NodeId> {
    let fragment = parse_fragment(dom, source)?;
    let head_children = dom.significant_children(fragment.head);
    let body_children = dom.significant_children(fragment.body);

    let root = match (head_children.len(), body_children.len()) {
        (h, b) if h > 0 && b > 0 => {
            dom.remove(fragment.html);
            return parse_document(dom, source);
        }
        (h, 0) if h > 0 => fragment.head,
        (_, 1) => body_children[0],
        (_, b) if b > 1 => {
            let div = dom.create_element("div", Attributes::new());
            dom.move_children(fragment.body, div);
            div
        }
        _ => {
            dom.remove(fragment.html);
            return Err(DomError::EmptyFragment);
        }
    };

    dom.detach(root);
    dom.remove(fragment.html);
    Ok(root)
}
