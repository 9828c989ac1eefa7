use crate::node::{Dom, NodeKind};
use crate::tags;
use indextree::NodeId;

/// Render a node and its subtree back to markup.
///
/// Text is written verbatim. Void elements are written as `<tag attrs/>`
/// and `fragment` elements contribute only their children.
pub fn render(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    render_into(dom, id, &mut out);
    out
}

pub fn render_into(dom: &Dom, id: NodeId, out: &mut String) {
    let Some(kind) = dom.kind(id) else {
        return;
    };

    match kind {
        NodeKind::Document => {
            for child in dom.children(id) {
                render_into(dom, child, out);
            }
        }
        NodeKind::Doctype(content) => {
            out.push_str("<!");
            out.push_str(content);
            out.push('>');
        }
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element { tag, .. } if tags::tag_eq(tag, tags::FRAGMENT_TAG) => {
            for child in dom.children(id) {
                render_into(dom, child, out);
            }
        }
        NodeKind::Element { tag, attributes } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                if !value.is_empty() || !key.contains("{{") {
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
            }

            if tags::is_void(tag) {
                out.push_str("/>");
                return;
            }

            out.push('>');
            for child in dom.children(id) {
                render_into(dom, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

/// Escape `"` outside of template actions
fn escape_attribute(value: &str, out: &mut String) {
    escape_outside_actions(value, out, |c, _, out| match c {
        '"' => out.push_str("&#34;"),
        c => out.push(c),
    });
}

/// Escape a value for use in either text or a quoted attribute.
///
/// Template actions and existing character references are kept as they are.
pub fn escape_markup(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_outside_actions(value, &mut out, |c, rest, out| match c {
        '"' => out.push_str("&#34;"),
        '\'' => out.push_str("&#39;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' if !starts_char_reference(rest) => out.push_str("&amp;"),
        c => out.push(c),
    });
    out
}

/// `rest` opens with `&name;`, `&#123;` or `&#x1F;`
fn starts_char_reference(rest: &str) -> bool {
    let Some(body) = rest.strip_prefix('&') else {
        return false;
    };
    let Some(end) = body.find(';') else {
        return false;
    };
    let name = &body[..end];
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(digits) = name.strip_prefix('#') {
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
    } else {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

/// Feed every character outside `{{ ... }}` to `escape` together with the
/// text starting at it
fn escape_outside_actions(
    value: &str,
    out: &mut String,
    mut escape: impl FnMut(char, &str, &mut String),
) {
    let mut rest = value;
    while !rest.is_empty() {
        if let Some(action) = rest.strip_prefix("{{") {
            let len = action.find("}}").map_or(rest.len(), |end| end + 4);
            out.push_str(&rest[..len]);
            rest = &rest[len..];
            continue;
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        escape(c, rest, out);
        rest = &rest[c.len_utf8()..];
    }
}
