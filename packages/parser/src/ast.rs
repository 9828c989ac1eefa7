use serde::{Deserialize, Serialize};

/// Byte range into the template source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A parsed template file: the top-level tree plus its named definitions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateSet {
    pub root: ListNode,
    /// Definitions in the order they first appear in the source
    pub definitions: Vec<Definition>,
}

impl TemplateSet {
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn first_definition(&self) -> Option<&Definition> {
        self.definitions.first()
    }

    pub fn has_definitions(&self) -> bool {
        !self.definitions.is_empty()
    }

    /// Register a definition; a redefinition replaces the body in place
    pub fn add_definition(&mut self, definition: Definition) {
        if let Some(existing) = self
            .definitions
            .iter_mut()
            .find(|d| d.name == definition.name)
        {
            *existing = definition;
        } else {
            self.definitions.push(definition);
        }
    }
}

/// `{{define "name"}} ... {{end}}` or `{{block "name" .}} ... {{end}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub body: ListNode,
    pub span: Span,
}

/// Sequence of nodes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListNode {
    pub nodes: Vec<Node>,
}

impl ListNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Template syntax tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Literal text between actions
    Text { text: String, span: Span },

    /// `{{pipeline}}`
    Action { pipe: Pipeline, span: Span },

    /// `{{if pipeline}} list {{else}} list {{end}}`
    If(Branch),

    /// `{{range pipeline}} list {{else}} list {{end}}`
    Range(Branch),

    /// `{{with pipeline}} list {{else}} list {{end}}`
    With(Branch),

    /// `{{template "name" pipeline}}`
    Template {
        name: String,
        pipe: Option<Pipeline>,
        span: Span,
    },

    /// `{{/* text */}}`
    Comment { text: String, span: Span },

    Break { span: Span },

    Continue { span: Span },
}

/// Shared shape of `if`, `range` and `with`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub pipe: Pipeline,
    pub list: ListNode,
    pub else_list: Option<ListNode>,
    pub span: Span,
}

/// Optional declaration followed by `|`-separated commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Declared or assigned variables, e.g. `$i, $e :=`
    pub decl: Vec<String>,
    /// `=` instead of `:=`
    pub is_assign: bool,
    pub cmds: Vec<Command>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub args: Vec<Arg>,
    pub span: Span,
}

impl Command {
    /// Name of the called function when the command starts with an identifier
    pub fn function_name(&self) -> Option<&str> {
        match self.args.first() {
            Some(Arg::Identifier { name, .. }) => Some(name),
            _ => None,
        }
    }
}

/// Command operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Arg {
    /// `.A.B`, one entry per accessed name
    Field { idents: Vec<String>, span: Span },

    /// Function name such as `eq`, `len` or `printf`
    Identifier { name: String, span: Span },

    /// `$x.A.B`; the first entry is the variable itself
    Variable { idents: Vec<String>, span: Span },

    Dot { span: Span },

    Nil { span: Span },

    Bool { value: bool, span: Span },

    /// Number or character constant, kept as written
    Number { text: String, span: Span },

    /// String constant, kept quoted as written
    String { quoted: String, span: Span },

    /// Parenthesized pipeline
    Pipeline(Box<Pipeline>),

    /// `(pipeline).A.B`
    Chain {
        node: Box<Arg>,
        fields: Vec<String>,
        span: Span,
    },
}

impl Arg {
    pub fn span(&self) -> Span {
        match self {
            Arg::Field { span, .. }
            | Arg::Identifier { span, .. }
            | Arg::Variable { span, .. }
            | Arg::Dot { span }
            | Arg::Nil { span }
            | Arg::Bool { span, .. }
            | Arg::Number { span, .. }
            | Arg::String { span, .. }
            | Arg::Chain { span, .. } => *span,
            Arg::Pipeline(pipe) => pipe.span,
        }
    }
}
