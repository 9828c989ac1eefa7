pub mod annotation;
pub mod ast;
pub mod error;
pub mod literal;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

#[cfg(test)]
mod tests_serializer;

pub use annotation::{rewrite_param_comments, PARAM_MARKER};
pub use ast::*;
pub use error::{ParseError, ParseResult};
pub use literal::{quote, unquote, UnquoteError};
pub use parser::{parse, Parser};
pub use serializer::{serialize, serialize_pipeline, Serializer};
pub use tokenizer::{lex_action, Token};

#[cfg(feature = "pretty-errors")]
pub use error::pretty::format_error;
