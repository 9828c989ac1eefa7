//! HTML tokenizer and tree builder.
//!
//! Markup is read leniently: unknown end tags are ignored, unclosed
//! elements are closed at the end of input, and template actions
//! (`{{ ... }}`) are opaque everywhere, including inside tags and
//! attribute values. Text and attribute values are kept exactly as written.

use crate::error::{DomError, DomResult};
use crate::node::{Attributes, Dom, NodeKind};
use crate::tags;
use indextree::NodeId;

const ACTION_OPEN: &str = "{{";
const ACTION_CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlToken {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
    Comment(String),
}

/// Split markup into tokens
pub fn tokenize(source: &str) -> DomResult<Vec<HtmlToken>> {
    Tokenizer { source, pos: 0 }.run()
}

struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn run(mut self) -> DomResult<Vec<HtmlToken>> {
        let mut tokens = Vec::new();

        while self.pos < self.source.len() {
            if self.at_markup() {
                let token = self.read_markup()?;
                let raw_text = match &token {
                    HtmlToken::StartTag {
                        name, self_closing, ..
                    } if !self_closing && tags::is_raw_text(name) => Some(name.clone()),
                    _ => None,
                };
                tokens.push(token);
                if let Some(name) = raw_text {
                    if let Some(text) = self.read_raw_text(&name) {
                        tokens.push(HtmlToken::Text(text));
                    }
                }
            } else {
                tokens.push(HtmlToken::Text(self.read_text()?));
            }
        }

        Ok(tokens)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Whether a tag, comment or doctype starts here
    fn at_markup(&self) -> bool {
        let mut chars = self.rest().chars();
        if chars.next() != Some('<') {
            return false;
        }
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '!' => true,
            Some('/') => chars.next().map_or(false, |c| c.is_ascii_alphabetic()),
            _ => false,
        }
    }

    /// Index just past the action starting at `at`
    fn skip_action(&self, at: usize) -> DomResult<usize> {
        let body = at + ACTION_OPEN.len();
        self.source[body..]
            .find(ACTION_CLOSE)
            .map(|offset| body + offset + ACTION_CLOSE.len())
            .ok_or_else(|| DomError::malformed(format!("unclosed template action at {}", at)))
    }

    fn advance_char(&mut self) {
        self.pos += self.rest().chars().next().map_or(1, char::len_utf8);
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn read_text(&mut self) -> DomResult<String> {
        let start = self.pos;
        while self.pos < self.source.len() {
            if self.rest().starts_with(ACTION_OPEN) {
                self.pos = self.skip_action(self.pos)?;
            } else if self.at_markup() {
                break;
            } else {
                self.advance_char();
            }
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn read_raw_text(&mut self, tag: &str) -> Option<String> {
        let needle = format!("</{}", tag.to_ascii_lowercase());
        let end = self
            .rest()
            .to_ascii_lowercase()
            .find(&needle)
            .map_or(self.source.len(), |offset| self.pos + offset);
        let text = &self.source[self.pos..end];
        self.pos = end;
        (!text.is_empty()).then(|| text.to_string())
    }

    fn read_markup(&mut self) -> DomResult<HtmlToken> {
        let rest = self.rest();

        if rest.starts_with("<!--") {
            let body = self.pos + 4;
            let end = self.source[body..]
                .find("-->")
                .map(|offset| body + offset)
                .ok_or_else(|| {
                    DomError::malformed(format!("unterminated comment at {}", self.pos))
                })?;
            self.pos = end + 3;
            return Ok(HtmlToken::Comment(self.source[body..end].to_string()));
        }

        if rest.starts_with("<!") {
            let body = self.pos + 2;
            let end = self.source[body..]
                .find('>')
                .map(|offset| body + offset)
                .ok_or_else(|| {
                    DomError::malformed(format!("unterminated declaration at {}", self.pos))
                })?;
            self.pos = end + 1;
            let content = &self.source[body..end];
            let is_doctype = content
                .get(..7)
                .map_or(false, |prefix| prefix.eq_ignore_ascii_case("doctype"));
            return Ok(if is_doctype {
                HtmlToken::Doctype(content.to_string())
            } else {
                HtmlToken::Comment(content.to_string())
            });
        }

        if rest.starts_with("</") {
            let start = self.pos;
            self.pos += 2;
            let name = self.read_tag_name();
            let end = self.rest().find('>').ok_or_else(|| {
                DomError::malformed(format!("unterminated end tag </{} at {}", name, start))
            })?;
            self.pos += end + 1;
            return Ok(HtmlToken::EndTag(name));
        }

        self.read_start_tag()
    }

    fn read_tag_name(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }

    fn read_start_tag(&mut self) -> DomResult<HtmlToken> {
        let start = self.pos;
        self.pos += 1;
        let name = self.read_tag_name();
        let mut attributes = Attributes::new();

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.is_empty() {
                return Err(DomError::malformed(format!(
                    "unterminated tag <{} at {}",
                    name, start
                )));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok(HtmlToken::StartTag {
                    name,
                    attributes,
                    self_closing: false,
                });
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(HtmlToken::StartTag {
                    name,
                    attributes,
                    self_closing: true,
                });
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let (key, value) = self.read_attribute()?;
            attributes.entry(key).or_insert(value);
        }
    }

    fn read_attribute(&mut self) -> DomResult<(String, String)> {
        let start = self.pos;
        while self.pos < self.source.len() {
            let rest = self.rest();
            if rest.starts_with(ACTION_OPEN) {
                self.pos = self.skip_action(self.pos)?;
                continue;
            }
            match rest.chars().next() {
                Some(c) if c.is_whitespace() || c == '=' || c == '>' => break,
                Some('/') if rest.starts_with("/>") => break,
                _ => self.advance_char(),
            }
        }
        let key = self.source[start..self.pos].to_string();

        let after_name = self.pos;
        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            self.pos = after_name;
            return Ok((key, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.rest().chars().next() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let value_start = self.pos;
                loop {
                    let rest = self.rest();
                    if rest.is_empty() {
                        return Err(DomError::malformed(format!(
                            "unterminated attribute value for {} at {}",
                            key, start
                        )));
                    }
                    if rest.starts_with(ACTION_OPEN) {
                        self.pos = self.skip_action(self.pos)?;
                    } else if rest.starts_with(quote) {
                        break;
                    } else {
                        self.advance_char();
                    }
                }
                let value = self.source[value_start..self.pos].to_string();
                self.pos += 1;
                value
            }
            _ => {
                let value_start = self.pos;
                while self.pos < self.source.len() {
                    let rest = self.rest();
                    if rest.starts_with(ACTION_OPEN) {
                        self.pos = self.skip_action(self.pos)?;
                        continue;
                    }
                    match rest.chars().next() {
                        Some(c) if c.is_whitespace() || c == '>' => break,
                        _ => self.advance_char(),
                    }
                }
                self.source[value_start..self.pos].to_string()
            }
        };

        Ok((key, value))
    }
}

/// Synthetic `html` root with its `head` and `body` sections
#[derive(Debug, Clone, Copy)]
pub struct HtmlFragment {
    pub html: NodeId,
    pub head: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Nothing but head content seen so far
    BeforeBody,
    /// Inside an explicit `<head>`
    InHead,
    InBody,
}

struct TreeBuilder<'d> {
    dom: &'d mut Dom,
    document: Option<NodeId>,
    fragment: HtmlFragment,
    stack: Vec<NodeId>,
    mode: Mode,
}

impl<'d> TreeBuilder<'d> {
    fn new(dom: &'d mut Dom, document: bool) -> Self {
        let document = document.then(|| dom.create_document());
        let html = dom.create_element("html", Attributes::new());
        let head = dom.create_element("head", Attributes::new());
        let body = dom.create_element("body", Attributes::new());
        dom.append(html, head);
        dom.append(html, body);
        if let Some(document) = document {
            dom.append(document, html);
        }

        Self {
            dom,
            document,
            fragment: HtmlFragment { html, head, body },
            stack: Vec::new(),
            mode: Mode::BeforeBody,
        }
    }

    fn process(&mut self, token: HtmlToken) {
        match token {
            HtmlToken::Doctype(content) => {
                if self.document.is_some() {
                    let doctype = self.dom.create(NodeKind::Doctype(content));
                    self.dom.insert_before(self.fragment.html, doctype);
                }
            }
            HtmlToken::StartTag {
                name, attributes, ..
            } if tags::tag_eq(&name, "html") => {
                self.merge_attributes(self.fragment.html, attributes);
            }
            HtmlToken::StartTag {
                name, attributes, ..
            } if tags::tag_eq(&name, "head") => {
                if self.mode == Mode::BeforeBody {
                    self.mode = Mode::InHead;
                    self.stack.clear();
                    self.merge_attributes(self.fragment.head, attributes);
                }
            }
            HtmlToken::StartTag {
                name, attributes, ..
            } if tags::tag_eq(&name, "body") => {
                self.enter_body();
                self.merge_attributes(self.fragment.body, attributes);
            }
            HtmlToken::EndTag(name) if tags::tag_eq(&name, "head") => {
                if self.mode == Mode::InHead {
                    self.mode = Mode::BeforeBody;
                    self.stack.clear();
                }
            }
            HtmlToken::EndTag(name)
                if tags::tag_eq(&name, "body") || tags::tag_eq(&name, "html") => {}
            HtmlToken::EndTag(name) => self.close(&name),
            HtmlToken::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let parent = self.insertion_parent(Some(&name), false);
                let element = self.dom.create_element(name.clone(), attributes);
                self.dom.append(parent, element);
                if !self_closing && !tags::is_void(&name) {
                    self.stack.push(element);
                }
            }
            HtmlToken::Text(text) => {
                let whitespace = text.trim().is_empty();
                if whitespace && self.stack.is_empty() && self.mode != Mode::InBody {
                    return;
                }
                let parent = self.insertion_parent(None, false);
                let node = self.dom.create_text(text);
                self.dom.append(parent, node);
            }
            HtmlToken::Comment(text) => {
                let parent = self.insertion_parent(None, true);
                let node = self.dom.create(NodeKind::Comment(text));
                self.dom.append(parent, node);
            }
        }
    }

    fn insertion_parent(&mut self, tag: Option<&str>, is_comment: bool) -> NodeId {
        if let Some(top) = self.stack.last() {
            return *top;
        }

        let head_content = is_comment || tag.map_or(false, tags::is_head_only);
        match self.mode {
            Mode::InBody => self.fragment.body,
            Mode::InHead | Mode::BeforeBody if head_content => self.fragment.head,
            Mode::InHead | Mode::BeforeBody => {
                self.enter_body();
                self.fragment.body
            }
        }
    }

    fn enter_body(&mut self) {
        if self.mode != Mode::InBody {
            self.mode = Mode::InBody;
            self.stack.clear();
        }
    }

    fn close(&mut self, name: &str) {
        if tags::is_void(name) {
            return;
        }
        let open = self
            .stack
            .iter()
            .rposition(|id| self.dom.is_element(*id, name));
        if let Some(index) = open {
            self.stack.truncate(index);
        }
    }

    fn merge_attributes(&mut self, id: NodeId, attributes: Attributes) {
        if let Some(NodeKind::Element {
            attributes: existing,
            ..
        }) = self.dom.kind_mut(id)
        {
            for (key, value) in attributes {
                existing.entry(key).or_insert(value);
            }
        }
    }
}

/// Parse markup as the content of an `html` element
pub fn parse_fragment(dom: &mut Dom, source: &str) -> DomResult<HtmlFragment> {
    let tokens = tokenize(source)?;
    let mut builder = TreeBuilder::new(dom, false);
    for token in tokens {
        builder.process(token);
    }
    Ok(builder.fragment)
}

/// Parse markup as a full document: `Document` > `html` > `head`, `body`
pub fn parse_document(dom: &mut Dom, source: &str) -> DomResult<NodeId> {
    let tokens = tokenize(source)?;
    let mut builder = TreeBuilder::new(dom, true);
    for token in tokens {
        builder.process(token);
    }
    builder
        .document
        .ok_or_else(|| DomError::malformed("document root was not created"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_attributes() {
        let tokens = tokenize(r#"<input type="text" disabled value='a "b"' data-x=1>"#).unwrap();
        let HtmlToken::StartTag { name, attributes, .. } = &tokens[0] else {
            panic!("expected start tag");
        };
        assert_eq!(name, "input");
        let pairs: Vec<_> = attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("type", "text"),
                ("disabled", ""),
                ("value", "a \"b\""),
                ("data-x", "1")
            ]
        );
    }

    #[test]
    fn test_actions_are_opaque_in_tags() {
        let tokens =
            tokenize(r#"<a class="{{ if eq .Kind "x" }}on{{ end }}" {{if .Open}}open{{end}}>"#)
                .unwrap();
        let HtmlToken::StartTag { attributes, .. } = &tokens[0] else {
            panic!("expected start tag");
        };
        assert_eq!(
            attributes.get("class").map(String::as_str),
            Some(r#"{{ if eq .Kind "x" }}on{{ end }}"#)
        );
        assert!(attributes.contains_key("{{if .Open}}open{{end}}"));
    }

    #[test]
    fn test_actions_are_opaque_in_text() {
        let tokens = tokenize(r#"<p>{{ if lt .A 3 }}<b>x</b>{{ end }}</p>"#).unwrap();
        assert_eq!(tokens[1], HtmlToken::Text("{{ if lt .A 3 }}".to_string()));
    }

    #[test]
    fn test_raw_text_elements() {
        let tokens = tokenize("<script>if (a < b) { x() }</script>").unwrap();
        assert_eq!(
            tokens[1],
            HtmlToken::Text("if (a < b) { x() }".to_string())
        );
        assert_eq!(tokens[2], HtmlToken::EndTag("script".to_string()));
    }

    #[test]
    fn test_unterminated_tag_is_malformed() {
        assert!(matches!(
            tokenize("<div class=\"x"),
            Err(DomError::MalformedFragment { .. })
        ));
    }

    #[test]
    fn test_fragment_splits_head_and_body() {
        let mut dom = Dom::new();
        let fragment =
            parse_fragment(&mut dom, "<title>T</title>\n<meta charset=\"utf-8\">\n<div>x</div>")
                .unwrap();
        assert_eq!(dom.significant_children(fragment.head).len(), 2);
        assert_eq!(dom.significant_children(fragment.body).len(), 1);
    }

    #[test]
    fn test_head_tags_after_body_content_stay_in_body() {
        let mut dom = Dom::new();
        let fragment = parse_fragment(&mut dom, "<div></div><style>p{}</style>").unwrap();
        assert!(dom.significant_children(fragment.head).is_empty());
        assert_eq!(dom.significant_children(fragment.body).len(), 2);
    }

    #[test]
    fn test_void_end_tags_are_ignored() {
        let mut dom = Dom::new();
        let fragment = parse_fragment(&mut dom, "<input type=\"email\"></input><p></p>").unwrap();
        let body = dom.children(fragment.body);
        assert_eq!(body.len(), 2);
        assert!(dom.children(body[0]).is_empty());
    }

    #[test]
    fn test_document_keeps_doctype() {
        let mut dom = Dom::new();
        let source =
            "<!DOCTYPE html><html><head><title>x</title></head><body><p>y</p></body></html>";
        let doc = parse_document(&mut dom, source).unwrap();
        let children = dom.children(doc);
        assert!(matches!(dom.kind(children[0]), Some(NodeKind::Doctype(_))));
        assert_eq!(dom.tag(children[1]), Some("html"));
    }
}
