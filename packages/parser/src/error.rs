use crate::ast::Span;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected {found} at {}: expected {expected}", span.start)]
    UnexpectedToken {
        span: Span,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of action at {}: expected {expected}", span.start)]
    UnexpectedEof { span: Span, expected: String },

    #[error("Invalid syntax at {}: {message}", span.start)]
    InvalidSyntax { span: Span, message: String },

    #[error("Lexer error at {}: {message}", span.start)]
    LexerError { span: Span, message: String },

    #[error("Unclosed action starting at {}", span.start)]
    UnclosedAction { span: Span },

    #[error("Unclosed comment starting at {}", span.start)]
    UnclosedComment { span: Span },
}

impl ParseError {
    pub fn unexpected_token(
        span: Span,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(span: Span, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            span,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: Span, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn lexer_error(span: Span, message: impl Into<String>) -> Self {
        Self::LexerError {
            span,
            message: message.into(),
        }
    }

    pub fn unclosed_action(span: Span) -> Self {
        Self::UnclosedAction { span }
    }

    pub fn unclosed_comment(span: Span) -> Self {
        Self::UnclosedComment { span }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexerError { span, .. }
            | ParseError::UnclosedAction { span }
            | ParseError::UnclosedComment { span } => *span,
        }
    }

    fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. }
            | ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::InvalidSyntax { message, .. } | ParseError::LexerError { message, .. } => {
                message.clone()
            }
            ParseError::UnclosedAction { .. } => "missing closing }}".to_string(),
            ParseError::UnclosedComment { .. } => "missing closing */".to_string(),
        }
    }
}

#[cfg(feature = "pretty-errors")]
pub mod pretty {
    use super::ParseError;
    use ariadne::{Color, Label, Report, ReportKind, Source};

    /// Pretty-print a parse error with source context using ariadne
    pub fn format_error(error: &ParseError, filename: &str, source: &str) -> String {
        let span = error.span();
        let start = span.start.min(source.len());
        let end = span.end.clamp(start, source.len());

        let mut output = Vec::new();
        let report = Report::build(ReportKind::Error, filename, start)
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, start..end))
                    .with_color(Color::Red)
                    .with_message(error.label()),
            )
            .finish();

        if report
            .write((filename, Source::from(source)), &mut output)
            .is_err()
        {
            return error.to_string();
        }

        String::from_utf8(output).unwrap_or_else(|_| error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_span() {
        let err = ParseError::invalid_syntax(Span::new(3, 7), "bad");
        assert_eq!(err.span(), Span::new(3, 7));
        assert_eq!(err.to_string(), "Invalid syntax at 3: bad");
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_pretty_error_mentions_file() {
        let source = "{{ if }}";
        let err = ParseError::unexpected_eof(Span::new(3, 5), "pipeline");
        let formatted = pretty::format_error(&err, "page.html", source);
        assert!(formatted.contains("page.html"));
    }
}
