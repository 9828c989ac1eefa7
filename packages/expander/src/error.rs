use htmlc_common::CommonError;
use htmlc_dom::DomError;
use htmlc_inference::InferenceError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a resolver could not produce a renderer
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no component named '{tag}'")]
    NotFound { tag: String },

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("{0}")]
    Other(String),
}

impl ResolveError {
    pub fn not_found(tag: impl Into<String>) -> Self {
        Self::NotFound { tag: tag.into() }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write component output")]
    Fmt(#[from] std::fmt::Error),

    #[error("{0}")]
    Template(String),
}

/// Errors that abort an expansion pass
#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Unresolved component <{tag}>")]
    UnresolvedComponent {
        tag: String,
        #[source]
        source: ResolveError,
    },

    #[error("Cyclic component <{tag}>: {}", chain.join(" -> "))]
    CyclicComponent { tag: String, chain: Vec<String> },

    #[error("Component <{tag}> nested deeper than {depth} levels")]
    ExpansionTooDeep { tag: String, depth: usize },

    #[error("Failed to render component <{tag}>")]
    Render {
        tag: String,
        #[source]
        source: RenderError,
    },

    #[error("Invalid output from component <{tag}>")]
    Dom {
        tag: String,
        #[source]
        source: DomError,
    },
}

impl ExpandError {
    /// Tag of the component the expansion failed on
    pub fn tag(&self) -> &str {
        match self {
            ExpandError::UnresolvedComponent { tag, .. }
            | ExpandError::CyclicComponent { tag, .. }
            | ExpandError::ExpansionTooDeep { tag, .. }
            | ExpandError::Render { tag, .. }
            | ExpandError::Dom { tag, .. } => tag,
        }
    }
}

pub type ExpandResult<T> = Result<T, ExpandError>;

/// Errors raised while loading component templates
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read component {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid component template '{name}': {source}")]
    Inference {
        name: String,
        #[source]
        source: InferenceError,
    },

    #[error(transparent)]
    Discovery(#[from] CommonError),
}
