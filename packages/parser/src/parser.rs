use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::literal::unquote;
use crate::tokenizer::{lex_action, Token};

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";

/// Scanned unit of template source
#[derive(Debug, Clone)]
enum Item<'src> {
    Text { text: &'src str, span: Span },
    Action { tokens: Vec<(Token<'src>, Span)>, span: Span },
    Comment { text: &'src str, span: Span },
}

/// Why a list stopped
#[derive(Debug, Clone, Copy)]
enum Stop {
    Eof,
    End(Span),
    /// `{{else ...}}`; the remaining tokens of the action are still pending
    Else(Span),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BranchKind {
    If,
    Range,
    With,
}

impl BranchKind {
    fn keyword(self) -> &'static str {
        match self {
            BranchKind::If => "if",
            BranchKind::Range => "range",
            BranchKind::With => "with",
        }
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split template source into text, comment and action items, applying
/// the `{{- ` and ` -}}` trim markers to neighbouring text.
fn scan(source: &str) -> ParseResult<Vec<Item<'_>>> {
    let mut items: Vec<Item<'_>> = Vec::new();
    let mut pos = 0;
    let mut trim_next_text = false;

    while pos <= source.len() {
        let open = match source[pos..].find(LEFT_DELIM) {
            Some(offset) => pos + offset,
            None => {
                push_text(&mut items, source, pos, source.len(), trim_next_text, false);
                break;
            }
        };

        let mut body = open + LEFT_DELIM.len();
        let rest = &source[body..];
        let trim_left = rest.starts_with('-') && rest[1..].starts_with(is_space);
        if trim_left {
            body += 1;
            body += source[body..].len() - source[body..].trim_start_matches(is_space).len();
        }

        push_text(&mut items, source, pos, open, trim_next_text, trim_left);

        if source[body..].starts_with(LEFT_COMMENT) {
            let (item, end, trim_right) = scan_comment(source, open, body)?;
            items.push(item);
            pos = end;
            trim_next_text = trim_right;
            continue;
        }

        let action = lex_action(source, body)?;
        items.push(Item::Action {
            tokens: action.tokens,
            span: Span::new(open, action.end),
        });
        pos = action.end;
        trim_next_text = action.trim_right;
    }

    Ok(items)
}

fn push_text<'src>(
    items: &mut Vec<Item<'src>>,
    source: &'src str,
    start: usize,
    end: usize,
    trim_start: bool,
    trim_end: bool,
) {
    let mut text = &source[start..end];
    let mut start = start;
    if trim_start {
        let trimmed = text.trim_start_matches(is_space);
        start += text.len() - trimmed.len();
        text = trimmed;
    }
    if trim_end {
        text = text.trim_end_matches(is_space);
    }
    if !text.is_empty() {
        items.push(Item::Text {
            text,
            span: Span::new(start, start + text.len()),
        });
    }
}

fn scan_comment(source: &str, open: usize, body: usize) -> ParseResult<(Item<'_>, usize, bool)> {
    let close = source[body + LEFT_COMMENT.len()..]
        .find(RIGHT_COMMENT)
        .map(|offset| body + LEFT_COMMENT.len() + offset + RIGHT_COMMENT.len())
        .ok_or_else(|| ParseError::unclosed_comment(Span::new(open, source.len())))?;

    let text = &source[body..close];
    let after = &source[close..];
    let spaced = after.trim_start_matches(is_space);
    let gap = after.len() - spaced.len();

    let (trim_right, delim_at) = if gap > 0 && spaced.starts_with('-') {
        (true, close + gap + 1)
    } else {
        (false, close + gap)
    };

    if !source[delim_at..].starts_with(RIGHT_DELIM) {
        return Err(ParseError::invalid_syntax(
            Span::new(close, delim_at),
            "comment ends before closing delimiter",
        ));
    }

    let end = delim_at + RIGHT_DELIM.len();
    Ok((
        Item::Comment {
            text,
            span: Span::new(open, end),
        },
        end,
        trim_right,
    ))
}

/// Recursive-descent parser for template markup
pub struct Parser<'src> {
    items: std::vec::IntoIter<Item<'src>>,
    /// Tokens of the action currently being parsed
    tokens: Vec<(Token<'src>, Span)>,
    pos: usize,
    action_span: Span,
    set: TemplateSet,
    depth: usize,
    range_depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let items = scan(source)?;
        Ok(Self {
            items: items.into_iter(),
            tokens: Vec::new(),
            pos: 0,
            action_span: Span::default(),
            set: TemplateSet::default(),
            depth: 0,
            range_depth: 0,
        })
    }

    /// Parse the whole source into a root tree plus named definitions
    pub fn parse_template_set(mut self) -> ParseResult<TemplateSet> {
        let (root, stop) = self.parse_list()?;
        match stop {
            Stop::Eof => {}
            Stop::End(span) => {
                return Err(ParseError::invalid_syntax(span, "unexpected {{end}}"));
            }
            Stop::Else(span) => {
                return Err(ParseError::invalid_syntax(span, "unexpected {{else}}"));
            }
        }
        self.set.root = root;
        Ok(self.set)
    }

    fn parse_list(&mut self) -> ParseResult<(ListNode, Stop)> {
        let mut list = ListNode::new();

        while let Some(item) = self.items.next() {
            match item {
                Item::Text { text, span } => list.push(Node::Text {
                    text: text.to_string(),
                    span,
                }),
                Item::Comment { text, span } => list.push(Node::Comment {
                    text: text.to_string(),
                    span,
                }),
                Item::Action { tokens, span } => {
                    self.tokens = tokens;
                    self.pos = 0;
                    self.action_span = span;

                    match self.peek_token() {
                        Some(Token::End) => {
                            self.advance();
                            self.expect_action_end()?;
                            return Ok((list, Stop::End(span)));
                        }
                        Some(Token::Else) => {
                            self.advance();
                            return Ok((list, Stop::Else(span)));
                        }
                        Some(Token::If) => {
                            self.advance();
                            list.push(Node::If(self.parse_branch(BranchKind::If, span)?));
                        }
                        Some(Token::Range) => {
                            self.advance();
                            list.push(Node::Range(self.parse_branch(BranchKind::Range, span)?));
                        }
                        Some(Token::With) => {
                            self.advance();
                            list.push(Node::With(self.parse_branch(BranchKind::With, span)?));
                        }
                        Some(Token::Define) => {
                            self.advance();
                            self.parse_define(span)?;
                        }
                        Some(Token::Block) => {
                            self.advance();
                            list.push(self.parse_block(span)?);
                        }
                        Some(Token::Template) => {
                            self.advance();
                            list.push(self.parse_template(span)?);
                        }
                        Some(Token::Break) | Some(Token::Continue) => {
                            list.push(self.parse_loop_control(span)?);
                        }
                        _ => {
                            let pipe = self.parse_pipeline(true, false)?;
                            self.expect_action_end()?;
                            list.push(Node::Action { pipe, span });
                        }
                    }
                }
            }
        }

        Ok((list, Stop::Eof))
    }

    fn parse_nested_list(&mut self) -> ParseResult<(ListNode, Stop)> {
        self.depth += 1;
        let result = self.parse_list();
        self.depth -= 1;
        result
    }

    /// `if`/`range`/`with` after the keyword has been consumed
    fn parse_branch(&mut self, kind: BranchKind, start: Span) -> ParseResult<Branch> {
        let pipe = self.parse_pipeline(true, false)?;
        self.expect_action_end()?;

        if kind == BranchKind::Range {
            self.range_depth += 1;
        }
        let body = self.parse_nested_list();
        if kind == BranchKind::Range {
            self.range_depth -= 1;
        }
        let (list, stop) = body?;

        let (else_list, end) = match stop {
            Stop::End(end) => (None, end),
            Stop::Eof => {
                return Err(ParseError::unexpected_eof(
                    start,
                    format!("{{{{end}}}} for {{{{{}}}}}", kind.keyword()),
                ));
            }
            Stop::Else(else_span) => {
                let chained = match (kind, self.peek_token()) {
                    (BranchKind::If, Some(Token::If)) | (BranchKind::With, Some(Token::With)) => {
                        true
                    }
                    _ => false,
                };

                if chained {
                    self.advance();
                    let nested = self.parse_branch(kind, else_span)?;
                    let end = nested.span;
                    let node = match kind {
                        BranchKind::With => Node::With(nested),
                        _ => Node::If(nested),
                    };
                    (Some(ListNode { nodes: vec![node] }), end)
                } else {
                    self.expect_action_end()?;
                    let (else_list, stop) = self.parse_nested_list()?;
                    match stop {
                        Stop::End(end) => (Some(else_list), end),
                        Stop::Else(span) => {
                            return Err(ParseError::invalid_syntax(
                                span,
                                format!("expected {{{{end}}}}; found extra {{{{else}}}} in {}", kind.keyword()),
                            ));
                        }
                        Stop::Eof => {
                            return Err(ParseError::unexpected_eof(
                                start,
                                format!("{{{{end}}}} for {{{{{}}}}}", kind.keyword()),
                            ));
                        }
                    }
                }
            }
        };

        Ok(Branch {
            pipe,
            list,
            else_list,
            span: start.join(end),
        })
    }

    fn parse_define(&mut self, start: Span) -> ParseResult<()> {
        if self.depth > 0 {
            return Err(ParseError::invalid_syntax(
                start,
                "{{define}} is only allowed at the top level",
            ));
        }

        let name = self.expect_name("define")?;
        self.expect_action_end()?;

        let (body, stop) = self.parse_nested_list()?;
        let end = self.expect_end_stop(stop, start, "define")?;

        tracing::trace!(name = %name, "parsed definition");
        self.set.add_definition(Definition {
            name,
            body,
            span: start.join(end),
        });
        Ok(())
    }

    /// `{{block "name" pipeline}}` defines `name` and invokes it in place
    fn parse_block(&mut self, start: Span) -> ParseResult<Node> {
        let name = self.expect_name("block")?;
        let pipe = self.parse_pipeline(false, false)?;
        self.expect_action_end()?;

        let (body, stop) = self.parse_nested_list()?;
        let end = self.expect_end_stop(stop, start, "block")?;

        self.set.add_definition(Definition {
            name: name.clone(),
            body,
            span: start.join(end),
        });

        Ok(Node::Template {
            name,
            pipe: Some(pipe),
            span: start,
        })
    }

    fn parse_template(&mut self, span: Span) -> ParseResult<Node> {
        let name = self.expect_name("template")?;
        let pipe = if self.is_action_end() {
            None
        } else {
            Some(self.parse_pipeline(false, false)?)
        };
        self.expect_action_end()?;
        Ok(Node::Template { name, pipe, span })
    }

    fn parse_loop_control(&mut self, span: Span) -> ParseResult<Node> {
        let node = match self.advance() {
            Some((Token::Break, _)) => Node::Break { span },
            _ => Node::Continue { span },
        };
        if self.range_depth == 0 {
            return Err(ParseError::invalid_syntax(
                span,
                "{{break}} and {{continue}} are only allowed inside {{range}}",
            ));
        }
        self.expect_action_end()?;
        Ok(node)
    }

    fn expect_end_stop(&self, stop: Stop, start: Span, keyword: &str) -> ParseResult<Span> {
        match stop {
            Stop::End(end) => Ok(end),
            Stop::Else(span) => Err(ParseError::invalid_syntax(
                span,
                format!("unexpected {{{{else}}}} in {}", keyword),
            )),
            Stop::Eof => Err(ParseError::unexpected_eof(
                start,
                format!("{{{{end}}}} for {{{{{}}}}}", keyword),
            )),
        }
    }

    fn expect_name(&mut self, context: &str) -> ParseResult<String> {
        let span = self.peek_span();
        match self.advance() {
            Some((Token::String(quoted), _)) | Some((Token::RawString(quoted), _)) => {
                unquote(quoted).map_err(|e| ParseError::invalid_syntax(span, e.to_string()))
            }
            other => Err(ParseError::unexpected_token(
                span,
                format!("{} name string", context),
                Self::format_token(other),
            )),
        }
    }

    /// Parse `[decl :=] command | command ...`.
    ///
    /// Inside parentheses the pipeline stops at the closing `)`.
    fn parse_pipeline(&mut self, allow_decl: bool, in_paren: bool) -> ParseResult<Pipeline> {
        let start = self.peek_span();
        let mut decl = Vec::new();
        let mut is_assign = false;

        if allow_decl {
            if let Some((vars, assign)) = self.peek_declaration() {
                decl = vars;
                is_assign = assign;
            }
        }

        let mut cmds = Vec::new();
        loop {
            cmds.push(self.parse_command(in_paren)?);
            if matches!(self.peek_token(), Some(Token::Pipe)) {
                self.advance();
            } else {
                break;
            }
        }

        let end = cmds.last().map(|c| c.span).unwrap_or(start);
        Ok(Pipeline {
            decl,
            is_assign,
            cmds,
            span: start.join(end),
        })
    }

    /// Consume `$x :=`, `$x =` or `$i, $e :=` when present
    fn peek_declaration(&mut self) -> Option<(Vec<String>, bool)> {
        let token_at = |offset: usize| self.tokens.get(self.pos + offset).map(|(t, _)| t);

        let first = match token_at(0) {
            Some(Token::Variable(v)) if !v.contains('.') => v.to_string(),
            _ => return None,
        };

        match token_at(1) {
            Some(Token::Declare) | Some(Token::Assign) => {
                let assign = matches!(token_at(1), Some(Token::Assign));
                self.pos += 2;
                Some((vec![first], assign))
            }
            Some(Token::Comma) => {
                let second = match token_at(2) {
                    Some(Token::Variable(v)) if !v.contains('.') => v.to_string(),
                    _ => return None,
                };
                match token_at(3) {
                    Some(Token::Declare) | Some(Token::Assign) => {
                        let assign = matches!(token_at(3), Some(Token::Assign));
                        self.pos += 4;
                        Some((vec![first, second], assign))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn parse_command(&mut self, in_paren: bool) -> ParseResult<Command> {
        let start = self.peek_span();
        let mut args = Vec::new();

        loop {
            match self.peek_token() {
                None | Some(Token::Pipe) => break,
                Some(Token::RParen) if in_paren => break,
                _ => args.push(self.parse_operand()?),
            }
        }

        if args.is_empty() {
            return Err(ParseError::invalid_syntax(start, "missing value for command"));
        }

        let end = args.last().map(Arg::span).unwrap_or(start);
        Ok(Command {
            args,
            span: start.join(end),
        })
    }

    fn parse_operand(&mut self) -> ParseResult<Arg> {
        let (token, span) = match self.advance() {
            Some((token, span)) => (token.clone(), *span),
            None => return Err(ParseError::unexpected_eof(self.action_span, "operand")),
        };

        let arg = match token {
            Token::Field(path) => Arg::Field {
                idents: split_fields(path),
                span,
            },
            Token::Variable(path) => Arg::Variable {
                idents: path.split('.').map(str::to_string).collect(),
                span,
            },
            Token::Dot => Arg::Dot { span },
            Token::Ident(name) => Arg::Identifier {
                name: name.to_string(),
                span,
            },
            Token::Nil => Arg::Nil { span },
            Token::True => Arg::Bool { value: true, span },
            Token::False => Arg::Bool { value: false, span },
            Token::Number(text) | Token::Char(text) => Arg::Number {
                text: text.to_string(),
                span,
            },
            Token::String(quoted) | Token::RawString(quoted) => Arg::String {
                quoted: quoted.to_string(),
                span,
            },
            Token::LParen => {
                let mut inner = self.parse_pipeline(true, true)?;
                let close = self.peek_span();
                match self.advance() {
                    Some((Token::RParen, _)) => {}
                    other => {
                        return Err(ParseError::unexpected_token(
                            close,
                            "')'",
                            Self::format_token(other),
                        ));
                    }
                }
                inner.span = span.join(close);
                let pipe = Arg::Pipeline(Box::new(inner));

                match self.tokens.get(self.pos) {
                    Some((Token::Field(path), field_span)) if field_span.start == close.end => {
                        let chain = Arg::Chain {
                            node: Box::new(pipe),
                            fields: split_fields(path),
                            span: span.join(*field_span),
                        };
                        self.pos += 1;
                        chain
                    }
                    _ => pipe,
                }
            }
            other => {
                return Err(ParseError::unexpected_token(
                    span,
                    "operand",
                    other.to_string(),
                ));
            }
        };

        Ok(arg)
    }

    // Helper methods

    fn peek_token(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Span)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_action_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn expect_action_end(&self) -> ParseResult<()> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some((token, span)) => Err(ParseError::unexpected_token(
                *span,
                "}}",
                token.to_string(),
            )),
        }
    }

    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| *span)
            .unwrap_or_else(|| {
                let end = self.action_span.end;
                Span::new(end, end)
            })
    }

    fn format_token(token: Option<&(Token<'_>, Span)>) -> String {
        match token {
            None => "end of action".to_string(),
            Some((Token::Ident(s), _)) => format!("identifier '{}'", s),
            Some((Token::Field(s), _)) => format!("field {}", s),
            Some((Token::Variable(s), _)) => format!("variable {}", s),
            Some((Token::Number(n), _)) => format!("number {}", n),
            Some((token, _)) => format!("'{}'", token),
        }
    }
}

fn split_fields(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse template source into a [`TemplateSet`]
pub fn parse(source: &str) -> ParseResult<TemplateSet> {
    Parser::new(source)?.parse_template_set()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_nodes(source: &str) -> Vec<Node> {
        parse(source).unwrap().root.nodes
    }

    #[test]
    fn test_parse_text_and_field() {
        let nodes = root_nodes("Hello {{.User.Name}}!");
        assert_eq!(nodes.len(), 3);
        match &nodes[1] {
            Node::Action { pipe, .. } => match &pipe.cmds[0].args[0] {
                Arg::Field { idents, .. } => assert_eq!(idents, &["User", "Name"]),
                other => panic!("expected field, got {:?}", other),
            },
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_trim_markers() {
        let nodes = root_nodes("a  {{- .X -}}  b");
        match (&nodes[0], &nodes[2]) {
            (Node::Text { text: a, .. }, Node::Text { text: b, .. }) => {
                assert_eq!(a, "a");
                assert_eq!(b, "b");
            }
            other => panic!("unexpected nodes {:?}", other),
        }
    }

    #[test]
    fn test_minus_without_space_is_not_trim() {
        let nodes = root_nodes("a {{-3}}");
        assert!(matches!(&nodes[0], Node::Text { text, .. } if text == "a "));
    }

    #[test]
    fn test_else_if_nests_in_else_list() {
        let nodes = root_nodes("{{if .A}}a{{else if .B}}b{{else}}c{{end}}");
        let Node::If(branch) = &nodes[0] else {
            panic!("expected if");
        };
        let else_list = branch.else_list.as_ref().unwrap();
        let Node::If(inner) = &else_list.nodes[0] else {
            panic!("expected nested if");
        };
        assert!(inner.else_list.is_some());
    }

    #[test]
    fn test_range_with_declaration() {
        let nodes = root_nodes("{{range $i, $e := .Items}}{{$e.Name}}{{end}}");
        let Node::Range(branch) = &nodes[0] else {
            panic!("expected range");
        };
        assert_eq!(branch.pipe.decl, vec!["$i", "$e"]);
        assert!(!branch.pipe.is_assign);
    }

    #[test]
    fn test_define_registers_definition() {
        let set = parse(r#"{{define "card"}}<div>{{.Title}}</div>{{end}}"#).unwrap();
        assert!(set.root.is_empty());
        assert_eq!(set.definitions.len(), 1);
        assert_eq!(set.definitions[0].name, "card");
    }

    #[test]
    fn test_redefinition_keeps_position() {
        let set = parse(r#"{{define "a"}}1{{end}}{{define "b"}}2{{end}}{{define "a"}}3{{end}}"#)
            .unwrap();
        let names: Vec<_> = set.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(matches!(&set.definitions[0].body.nodes[0], Node::Text { text, .. } if text == "3"));
    }

    #[test]
    fn test_block_defines_and_invokes() {
        let set = parse(r#"{{block "nav" .}}<nav></nav>{{end}}"#).unwrap();
        assert!(set.definition("nav").is_some());
        assert!(matches!(&set.root.nodes[0], Node::Template { name, .. } if name == "nav"));
    }

    #[test]
    fn test_comment_with_trim() {
        let nodes = root_nodes("x {{- /* note */ -}} y");
        assert!(matches!(&nodes[1], Node::Comment { text, .. } if text == "/* note */"));
        assert!(matches!(&nodes[2], Node::Text { text, .. } if text == "y"));
    }

    #[test]
    fn test_parenthesized_chain() {
        let nodes = root_nodes("{{(index .Items 0).Name}}");
        let Node::Action { pipe, .. } = &nodes[0] else {
            panic!("expected action");
        };
        assert!(matches!(&pipe.cmds[0].args[0], Arg::Chain { fields, .. } if fields == &["Name"]));
    }

    #[test]
    fn test_pipeline_commands() {
        let nodes = root_nodes(r#"{{.Name | printf "%s" | html}}"#);
        let Node::Action { pipe, .. } = &nodes[0] else {
            panic!("expected action");
        };
        assert_eq!(pipe.cmds.len(), 3);
        assert_eq!(pipe.cmds[2].function_name(), Some("html"));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse("{{if .A}}"), Err(ParseError::UnexpectedEof { .. })));
        assert!(matches!(parse("{{end}}"), Err(ParseError::InvalidSyntax { .. })));
        assert!(matches!(parse("{{break}}"), Err(ParseError::InvalidSyntax { .. })));
        assert!(matches!(parse("{{}}"), Err(ParseError::InvalidSyntax { .. })));
        assert!(matches!(parse("{{/* open"), Err(ParseError::UnclosedComment { .. })));
        assert!(matches!(parse("{{.A"), Err(ParseError::UnclosedAction { .. })));
        assert!(parse(r#"{{if .A}}{{define "x"}}{{end}}{{end}}"#).is_err());
    }

    #[test]
    fn test_break_inside_range() {
        assert!(parse("{{range .Items}}{{if .Done}}{{break}}{{end}}{{end}}").is_ok());
    }
}
