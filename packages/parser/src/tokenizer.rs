//! Tokenizer for the inside of template actions (`{{ ... }}`) using logos.
//!
//! Text outside actions is scanned by the parser itself; logos only sees the
//! action body and stops at the first closing delimiter.

use crate::ast::Span;
use crate::error::{ParseError, ParseResult};
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'src> {
    // Delimiters
    #[token("}}")]
    RightDelim,

    #[regex(r"[ \t\r\n]+-\}\}")]
    TrimRightDelim,

    // Keywords
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("end")]
    End,
    #[token("range")]
    Range,
    #[token("with")]
    With,
    #[token("define")]
    Define,
    #[token("template")]
    Template,
    #[token("block")]
    Block,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Operands
    #[regex(r"(\.[A-Za-z_][A-Za-z0-9_]*)+", |lex| lex.slice())]
    Field(&'src str),

    #[token(".")]
    Dot,

    #[regex(r"\$[A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice())]
    Variable(&'src str),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"`[^`]*`", |lex| lex.slice())]
    RawString(&'src str),

    #[regex(r"'([^'\\\n]|\\.)+'", |lex| lex.slice())]
    Char(&'src str),

    #[regex(
        r"[+-]?(0[xXoObB][0-9a-fA-F_]+|[0-9][0-9_]*(\.[0-9_]+)?([eE][+-]?[0-9]+)?)",
        |lex| lex.slice()
    )]
    Number(&'src str),

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("|")]
    Pipe,
    #[token(",")]
    Comma,
    #[token(":=")]
    Declare,
    #[token("=")]
    Assign,
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::RightDelim => write!(f, "}}}}"),
            Token::TrimRightDelim => write!(f, "-}}}}"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::End => write!(f, "end"),
            Token::Range => write!(f, "range"),
            Token::With => write!(f, "with"),
            Token::Define => write!(f, "define"),
            Token::Template => write!(f, "template"),
            Token::Block => write!(f, "block"),
            Token::Break => write!(f, "break"),
            Token::Continue => write!(f, "continue"),
            Token::Nil => write!(f, "nil"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Field(s)
            | Token::Variable(s)
            | Token::Ident(s)
            | Token::String(s)
            | Token::RawString(s)
            | Token::Char(s)
            | Token::Number(s) => write!(f, "{}", s),
            Token::Dot => write!(f, "."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Pipe => write!(f, "|"),
            Token::Comma => write!(f, ","),
            Token::Declare => write!(f, ":="),
            Token::Assign => write!(f, "="),
        }
    }
}

/// Tokens of one action, with absolute spans into the template source
#[derive(Debug, Clone)]
pub struct ActionTokens<'src> {
    pub tokens: Vec<(Token<'src>, Span)>,
    /// Byte offset just past the closing delimiter
    pub end: usize,
    /// Whether the action closed with ` -}}`
    pub trim_right: bool,
}

/// Lex an action body starting at byte `start` of `source`.
///
/// `start` points just past the opening delimiter (and its trim marker).
pub fn lex_action(source: &str, start: usize) -> ParseResult<ActionTokens<'_>> {
    let mut lexer = Token::lexer(&source[start..]);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(start + range.start, start + range.end);

        match result {
            Ok(Token::RightDelim) => {
                return Ok(ActionTokens {
                    tokens,
                    end: span.end,
                    trim_right: false,
                });
            }
            Ok(Token::TrimRightDelim) => {
                return Ok(ActionTokens {
                    tokens,
                    end: span.end,
                    trim_right: true,
                });
            }
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ParseError::lexer_error(
                    span,
                    format!("unexpected character {:?} in action", lexer.slice()),
                ));
            }
        }
    }

    Err(ParseError::unclosed_action(Span::new(
        start.saturating_sub(2),
        source.len(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        lex_action(source, 0)
            .unwrap()
            .tokens
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_lex_field_chain() {
        assert_eq!(kinds(".User.Name}}"), vec![Token::Field(".User.Name")]);
    }

    #[test]
    fn test_lex_keywords_and_idents() {
        assert_eq!(
            kinds("if and .A .B}}"),
            vec![
                Token::If,
                Token::Ident("and"),
                Token::Field(".A"),
                Token::Field(".B"),
            ]
        );
    }

    #[test]
    fn test_lex_trim_right() {
        let action = lex_action(" .Name -}} tail", 0).unwrap();
        assert!(action.trim_right);
        assert_eq!(action.end, 10);
    }

    #[test]
    fn test_lex_string_with_delimiter_inside() {
        let action = lex_action(r#" "}}" }}"#, 0).unwrap();
        assert_eq!(action.tokens[0].0, Token::String(r#""}}""#));
        assert!(!action.trim_right);
    }

    #[test]
    fn test_lex_declaration() {
        assert_eq!(
            kinds("$x := .Items}}"),
            vec![Token::Variable("$x"), Token::Declare, Token::Field(".Items")]
        );
    }

    #[test]
    fn test_lex_unclosed() {
        assert!(matches!(
            lex_action(" .Name ", 0),
            Err(ParseError::UnclosedAction { .. })
        ));
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            kinds("gt 1 -2 3.5}}"),
            vec![
                Token::Ident("gt"),
                Token::Number("1"),
                Token::Number("-2"),
                Token::Number("3.5"),
            ]
        );
    }
}
