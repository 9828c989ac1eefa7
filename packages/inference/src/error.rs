use htmlc_parser::ParseError;
use thiserror::Error;

/// Errors that can occur during type inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Malformed @param annotation in template '{template}': {message}")]
    AnnotationDecode { template: String, message: String },

    #[error("Template syntax error: {0}")]
    Parse(#[from] ParseError),
}

impl InferenceError {
    pub fn annotation_decode(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AnnotationDecode {
            template: template.into(),
            message: message.into(),
        }
    }
}

pub type InferenceResult<T> = Result<T, InferenceError>;
