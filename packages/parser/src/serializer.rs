use crate::ast::*;

/// Prints a syntax tree back to canonical template text.
///
/// Text is written verbatim, actions in their compact form (`{{.A.B}}`,
/// `{{if .X}}...{{end}}`). Comments are dropped and `else if` chains are
/// printed as an `if` nested inside the `else` branch.
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn write_list(&mut self, list: &ListNode) {
        for node in &list.nodes {
            self.write_node(node);
        }
    }

    pub fn write_node(&mut self, node: &Node) {
        match node {
            Node::Text { text, .. } => self.output.push_str(text),
            Node::Action { pipe, .. } => {
                self.output.push_str("{{");
                self.write_pipeline(pipe);
                self.output.push_str("}}");
            }
            Node::If(branch) => self.write_branch("if", branch),
            Node::Range(branch) => self.write_branch("range", branch),
            Node::With(branch) => self.write_branch("with", branch),
            Node::Template { name, pipe, .. } => {
                self.output.push_str("{{template ");
                self.output.push_str(&crate::literal::quote(name));
                if let Some(pipe) = pipe {
                    self.output.push(' ');
                    self.write_pipeline(pipe);
                }
                self.output.push_str("}}");
            }
            Node::Comment { .. } => {}
            Node::Break { .. } => self.output.push_str("{{break}}"),
            Node::Continue { .. } => self.output.push_str("{{continue}}"),
        }
    }

    fn write_branch(&mut self, keyword: &str, branch: &Branch) {
        self.output.push_str("{{");
        self.output.push_str(keyword);
        self.output.push(' ');
        self.write_pipeline(&branch.pipe);
        self.output.push_str("}}");
        self.write_list(&branch.list);
        if let Some(else_list) = &branch.else_list {
            self.output.push_str("{{else}}");
            self.write_list(else_list);
        }
        self.output.push_str("{{end}}");
    }

    pub fn write_pipeline(&mut self, pipe: &Pipeline) {
        if !pipe.decl.is_empty() {
            self.output.push_str(&pipe.decl.join(", "));
            self.output.push_str(if pipe.is_assign { " = " } else { " := " });
        }
        for (i, cmd) in pipe.cmds.iter().enumerate() {
            if i > 0 {
                self.output.push_str(" | ");
            }
            self.write_command(cmd);
        }
    }

    fn write_command(&mut self, cmd: &Command) {
        for (i, arg) in cmd.args.iter().enumerate() {
            if i > 0 {
                self.output.push(' ');
            }
            self.write_arg(arg);
        }
    }

    pub fn write_arg(&mut self, arg: &Arg) {
        match arg {
            Arg::Field { idents, .. } => {
                for ident in idents {
                    self.output.push('.');
                    self.output.push_str(ident);
                }
            }
            Arg::Identifier { name, .. } => self.output.push_str(name),
            Arg::Variable { idents, .. } => self.output.push_str(&idents.join(".")),
            Arg::Dot { .. } => self.output.push('.'),
            Arg::Nil { .. } => self.output.push_str("nil"),
            Arg::Bool { value, .. } => self.output.push_str(if *value { "true" } else { "false" }),
            Arg::Number { text, .. } => self.output.push_str(text),
            Arg::String { quoted, .. } => self.output.push_str(quoted),
            Arg::Pipeline(pipe) => {
                self.output.push('(');
                self.write_pipeline(pipe);
                self.output.push(')');
            }
            Arg::Chain { node, fields, .. } => {
                self.write_arg(node);
                for field in fields {
                    self.output.push('.');
                    self.output.push_str(field);
                }
            }
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a node list to template text
pub fn serialize(list: &ListNode) -> String {
    let mut serializer = Serializer::new();
    serializer.write_list(list);
    serializer.finish()
}

/// Serialize a single pipeline, e.g. for diagnostics
pub fn serialize_pipeline(pipe: &Pipeline) -> String {
    let mut serializer = Serializer::new();
    serializer.write_pipeline(pipe);
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn roundtrip(source: &str) -> String {
        serialize(&parse(source).unwrap().root)
    }

    #[test]
    fn test_serialize_canonical_forms() {
        assert_eq!(roundtrip("<p>{{ .User.Name }}</p>"), "<p>{{.User.Name}}</p>");
        assert_eq!(
            roundtrip("{{ if .Show }}yes{{ else }}no{{ end }}"),
            "{{if .Show}}yes{{else}}no{{end}}"
        );
        assert_eq!(
            roundtrip(r#"{{ template "item" . }}"#),
            r#"{{template "item" .}}"#
        );
    }

    #[test]
    fn test_serialize_drops_comments() {
        assert_eq!(roundtrip("a{{/* hidden */}}b"), "ab");
    }

    #[test]
    fn test_serialize_declaration_and_parens() {
        assert_eq!(
            roundtrip("{{ $n := len (index .Items 0) }}"),
            "{{$n := len (index .Items 0)}}"
        );
    }
}
