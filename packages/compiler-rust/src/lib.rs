//! # htmlc Rust compiler
//!
//! Prints the schemas inferred from templates as Rust modules: the template
//! source as a `TEMPLATE` constant, one serde struct per definition and a
//! `parse_<module>` function decoding the first one from JSON.

mod compiler;
mod context;
mod error;
mod format;
mod printer;

pub use compiler::{
    compile_template, module_name, parse, parse_dir, struct_name_for, TemplateInput, INIT_FILE,
    STDOUT_PARSE_FUNC, STDOUT_STRUCT_NAME,
};
pub use context::{CompilerContext, ParseOptions, PreProcess};
pub use error::{CompileError, CompileResult, FormatFailure};
pub use format::{format_or_raw, format_source};
pub use printer::{print_file, print_init, raw_string_literal, FileArgs, InitArgs};

// Re-export from inference crate for convenience
pub use htmlc_inference::{CodeGenerator, InferenceEngine, ParsedFile, RustGenerator, Schema};

#[cfg(test)]
mod tests;
