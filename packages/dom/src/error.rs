use htmlc_parser::ParseError;
use thiserror::Error;

pub type DomResult<T> = Result<T, DomError>;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Malformed fragment: {message}")]
    MalformedFragment {
        message: String,
        #[source]
        source: Option<ParseError>,
    },

    #[error("Fragment has no usable root element")]
    EmptyFragment,
}

impl DomError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFragment {
            message: message.into(),
            source: None,
        }
    }
}

impl From<ParseError> for DomError {
    fn from(error: ParseError) -> Self {
        Self::MalformedFragment {
            message: error.to_string(),
            source: Some(error),
        }
    }
}
