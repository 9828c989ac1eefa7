//! Tag classification.
//!
//! Every element whose tag is not a native HTML tag, the slot placeholder
//! or the fragment marker is a component invocation.

/// Slot placeholder for caller-provided children
pub const CHILDREN_TAG: &str = "children";

/// Non-materializing wrapper whose children splice into the parent
pub const FRAGMENT_TAG: &str = "fragment";

/// Subtrees that are never searched for components
pub const OPAQUE_TAG: &str = "svg";

const NATIVE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "applet", "area", "article", "aside", "audio", "b", "base",
    "basefont", "bdi", "bdo", "big", "blink", "blockquote", "body", "br", "button", "canvas",
    "caption", "center", "cite", "code", "col", "colgroup", "content", "data", "datalist", "dd",
    "del", "details", "dfn", "dialog", "dir", "div", "dl", "dt", "element", "em", "embed",
    "fieldset", "figcaption", "figure", "font", "footer", "form", "frame", "frameset", "h1", "h2",
    "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "image",
    "img", "input", "ins", "kbd", "keygen", "label", "legend", "li", "link", "main", "map", "mark",
    "marquee", "math", "menu", "menuitem", "meta", "meter", "nav", "nobr", "noembed", "noframes",
    "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture",
    "plaintext", "portal", "pre", "progress", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp",
    "script", "search", "section", "select", "shadow", "slot", "small", "source", "spacer",
    "span", "strike", "strong", "style", "sub", "summary", "sup", "svg", "table", "tbody", "td",
    "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "tt", "u",
    "ul", "var", "video", "wbr", "xmp",
];

const HEAD_TAGS: &[&str] = &[
    "base", "link", "meta", "noscript", "script", "style", "template", "title",
];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

fn contains(set: &[&str], tag: &str) -> bool {
    set.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Whether `tag` is a native HTML element
pub fn is_native(tag: &str) -> bool {
    contains(NATIVE_TAGS, tag)
}

/// Whether an element with this tag must be resolved as a component
pub fn is_target(tag: &str) -> bool {
    !is_native(tag)
        && !tag.eq_ignore_ascii_case(CHILDREN_TAG)
        && !tag.eq_ignore_ascii_case(FRAGMENT_TAG)
}

/// Elements that belong in `<head>` when they appear before body content
pub fn is_head_only(tag: &str) -> bool {
    contains(HEAD_TAGS, tag)
}

/// Elements without content or end tag
pub fn is_void(tag: &str) -> bool {
    contains(VOID_TAGS, tag)
}

/// Elements whose content is kept as unparsed text
pub fn is_raw_text(tag: &str) -> bool {
    contains(RAW_TEXT_TAGS, tag)
}

pub fn tag_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_tags_are_case_insensitive() {
        assert!(is_native("div"));
        assert!(is_native("DIV"));
        assert!(!is_target("Section"));
    }

    #[test]
    fn test_component_tags_are_targets() {
        assert!(is_target("Card"));
        assert!(is_target("ui-button"));
        assert!(is_target("textinput"));
    }

    #[test]
    fn test_reserved_tags_are_not_targets() {
        assert!(!is_target("children"));
        assert!(!is_target("Children"));
        assert!(!is_target("fragment"));
    }

    #[test]
    fn test_head_and_void_sets() {
        assert!(is_head_only("meta"));
        assert!(!is_head_only("div"));
        assert!(is_void("input"));
        assert!(!is_void("div"));
        assert!(is_raw_text("script"));
    }
}
