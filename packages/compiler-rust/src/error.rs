use htmlc_common::CommonError;
use htmlc_inference::InferenceError;
use std::path::PathBuf;
use thiserror::Error;

/// Generated source did not parse as Rust
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to format generated source: {message}")]
pub struct FormatFailure {
    pub message: String,
}

/// Errors that can occur while generating code for templates
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to infer schema for {file}: {source}")]
    Inference {
        file: String,
        #[source]
        source: InferenceError,
    },

    #[error("Pre-processing {file} failed: {message}")]
    PreProcess { file: String, message: String },

    #[error(transparent)]
    Discovery(#[from] CommonError),
}

impl CompileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn inference(file: impl Into<String>, source: InferenceError) -> Self {
        Self::Inference {
            file: file.into(),
            source,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
