//! Partial evaluation of component templates.
//!
//! Only values known at build time are substituted: attribute values passed
//! to the component. Every other action is printed back unchanged so the
//! page can still be executed as a template later.

use crate::component::Renderer;
use crate::error::RenderError;
use htmlc_dom::{escape_markup, CHILDREN_TAG};
use htmlc_inference::to_field_name;
use htmlc_parser::ast::*;
use htmlc_parser::{serialize_pipeline, Serializer, PARAM_MARKER};
use indexmap::IndexMap;
use std::fmt::Write;

/// Prop values keyed by exported field name
pub type Props = IndexMap<String, String>;

/// Markup a `{{children}}` call stands for
pub const CHILDREN_MARKUP: &str = "<children></children>";

/// Truthiness of an attribute value in an `if` condition
pub fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "false" && value != "0"
}

/// Renders one definition with its props substituted
pub struct TemplateRenderer<'a> {
    definition: &'a Definition,
    props: Props,
    warnings: Vec<String>,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(definition: &'a Definition, props: Props, warnings: Vec<String>) -> Self {
        Self {
            definition,
            props,
            warnings,
        }
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Evaluated template text
    pub fn evaluate(&self) -> String {
        let mut out = String::new();
        PartialEvaluator { props: &self.props }.write_list(&self.definition.body, &mut out);
        out
    }
}

impl Renderer for TemplateRenderer<'_> {
    fn render(&self, out: &mut dyn Write) -> Result<(), RenderError> {
        out.write_str(&self.evaluate())?;
        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }
}

struct PartialEvaluator<'p> {
    props: &'p Props,
}

impl PartialEvaluator<'_> {
    fn write_list(&self, list: &ListNode, out: &mut String) {
        for node in &list.nodes {
            self.write_node(node, out);
        }
    }

    fn write_node(&self, node: &Node, out: &mut String) {
        match node {
            Node::Text { text, .. } => out.push_str(text),

            Node::Action { pipe, .. } => {
                if is_annotation(pipe) {
                    return;
                }
                if let Some(value) = self.known_value(pipe) {
                    out.push_str(&escape_markup(value));
                } else if is_children_call(pipe) {
                    out.push_str(CHILDREN_MARKUP);
                } else {
                    write_verbatim(node, out);
                }
            }

            Node::If(branch) => match self.known_value(&branch.pipe) {
                Some(value) if is_truthy(value) => self.write_list(&branch.list, out),
                Some(_) => {
                    if let Some(else_list) = &branch.else_list {
                        self.write_list(else_list, out);
                    }
                }
                None => {
                    out.push_str("{{if ");
                    out.push_str(&serialize_pipeline(&branch.pipe));
                    out.push_str("}}");
                    self.write_list(&branch.list, out);
                    if let Some(else_list) = &branch.else_list {
                        out.push_str("{{else}}");
                        self.write_list(else_list, out);
                    }
                    out.push_str("{{end}}");
                }
            },

            Node::Template { name, .. } if name == CHILDREN_TAG => out.push_str(CHILDREN_MARKUP),

            Node::Comment { .. } => {}

            // range and with rebind the dot; their bodies are not ours to fill
            Node::Range(_)
            | Node::With(_)
            | Node::Template { .. }
            | Node::Break { .. }
            | Node::Continue { .. } => write_verbatim(node, out),
        }
    }

    /// Value of a bare single-name `.Field` pipeline when the field is a
    /// prop; `.A.B` stays an action since props are plain strings
    fn known_value(&self, pipe: &Pipeline) -> Option<&str> {
        if !pipe.decl.is_empty() {
            return None;
        }
        match pipe.cmds.as_slice() {
            [cmd] => match cmd.args.as_slice() {
                [Arg::Field { idents, .. }] => match idents.as_slice() {
                    [name] => self.props.get(&to_field_name(name)).map(String::as_str),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }
}

fn is_children_call(pipe: &Pipeline) -> bool {
    pipe.decl.is_empty()
        && matches!(pipe.cmds.as_slice(), [cmd]
            if matches!(cmd.args.as_slice(), [Arg::Identifier { name, .. }] if name == CHILDREN_TAG))
}

fn is_annotation(pipe: &Pipeline) -> bool {
    pipe.cmds
        .first()
        .map_or(false, |cmd| cmd.function_name() == Some(PARAM_MARKER))
}

fn write_verbatim(node: &Node, out: &mut String) {
    let mut serializer = Serializer::new();
    serializer.write_node(node);
    out.push_str(&serializer.finish());
}

#[cfg(test)]
mod tests {
    use super::*;
    use htmlc_parser::parse;

    fn evaluate(source: &str, props: &[(&str, &str)]) -> String {
        let set = parse(&format!("{{{{define \"c\"}}}}{}{{{{end}}}}", source)).unwrap();
        let props = props
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TemplateRenderer::new(&set.definitions[0], props, Vec::new()).evaluate()
    }

    #[test]
    fn test_known_field_is_substituted() {
        assert_eq!(
            evaluate(r#"<h1 class="{{.Class}}">{{.Title}}</h1>"#, &[("Title", "Hello")]),
            r#"<h1 class="{{.Class}}">Hello</h1>"#
        );
    }

    #[test]
    fn test_field_name_is_normalized() {
        assert_eq!(evaluate("{{.title}}", &[("Title", "x")]), "x");
    }

    #[test]
    fn test_if_on_known_prop_picks_branch() {
        let source = "{{if .Open}}open{{else}}closed{{end}}";
        assert_eq!(evaluate(source, &[("Open", "true")]), "open");
        assert_eq!(evaluate(source, &[("Open", "false")]), "closed");
        assert_eq!(evaluate(source, &[("Open", "")]), "closed");
        assert_eq!(evaluate(source, &[("Open", "0")]), "closed");
    }

    #[test]
    fn test_unknown_if_keeps_action_and_fills_branches() {
        assert_eq!(
            evaluate("{{if .User}}{{.Title}}{{else}}-{{end}}", &[("Title", "T")]),
            "{{if .User}}T{{else}}-{{end}}"
        );
    }

    #[test]
    fn test_range_is_verbatim() {
        assert_eq!(
            evaluate("{{range .Items}}{{.Title}}{{end}}", &[("Title", "T")]),
            "{{range .Items}}{{.Title}}{{end}}"
        );
    }

    #[test]
    fn test_children_forms() {
        assert_eq!(evaluate("<div>{{children}}</div>", &[]), "<div><children></children></div>");
        assert_eq!(
            evaluate(r#"<div>{{template "children"}}</div>"#, &[]),
            "<div><children></children></div>"
        );
    }

    #[test]
    fn test_annotation_markers_are_dropped() {
        assert_eq!(
            evaluate(r#"{{__param__ "Title" "string"}}<b>{{.Title}}</b>"#, &[("Title", "x")]),
            "<b>x</b>"
        );
    }

    #[test]
    fn test_nested_field_of_prop_stays_an_action() {
        assert_eq!(
            evaluate("<p>{{.Profile.Name}}</p>", &[("Profile", "raw")]),
            "<p>{{.Profile.Name}}</p>"
        );
        assert_eq!(
            evaluate("{{if .Profile.Open}}o{{end}}", &[("Profile", "raw")]),
            "{{if .Profile.Open}}o{{end}}"
        );
    }

    #[test]
    fn test_substituted_values_are_escaped() {
        assert_eq!(
            evaluate(
                r#"<span title="{{.Label}}">{{.Label}}</span>"#,
                &[("Label", r#"say "hi" <b>"#)]
            ),
            r#"<span title="say &#34;hi&#34; &lt;b&gt;">say &#34;hi&#34; &lt;b&gt;</span>"#
        );
    }

    #[test]
    fn test_pipelines_are_not_substituted() {
        assert_eq!(
            evaluate("{{.Title | upper}}", &[("Title", "x")]),
            "{{.Title | upper}}"
        );
    }
}
