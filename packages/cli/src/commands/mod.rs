pub mod expand;
pub mod generate;
pub mod init;
pub mod schema;

pub use expand::{expand, ExpandArgs};
pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};
pub use schema::{schema, SchemaArgs};

use anyhow::anyhow;
use colored::Colorize;
use htmlc_common::{Diagnostic, DiagnosticSink, Severity, DEFAULT_GLOB_PATTERNS};
use htmlc_compiler_rust::CompileError;
use htmlc_inference::InferenceError;
use std::path::Path;

/// Prints diagnostics to stderr as they arrive
#[derive(Debug, Default)]
pub struct ConsoleSink {
    pub warnings: usize,
}

impl DiagnosticSink for ConsoleSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let label = match diagnostic.severity {
            Severity::Warning => {
                self.warnings += 1;
                "warning:".yellow().bold()
            }
            Severity::Info => "info:".bright_blue().bold(),
        };
        match &diagnostic.source {
            Some(source) => eprintln!("  {} {} {}", label, diagnostic.message, source.dimmed()),
            None => eprintln!("  {} {}", label, diagnostic.message),
        }
    }
}

/// Configured patterns, or the defaults when none are given
pub fn patterns_or_default(patterns: &[String]) -> Vec<String> {
    if patterns.is_empty() {
        DEFAULT_GLOB_PATTERNS.iter().map(|p| p.to_string()).collect()
    } else {
        patterns.to_vec()
    }
}

/// Turn a compile error into a report, rendering template syntax errors
/// against the file they came from when it can be read from `input_dir`
pub fn describe_compile_error(err: CompileError, input_dir: &Path) -> anyhow::Error {
    if let CompileError::Inference {
        file,
        source: InferenceError::Parse(parse_error),
    } = &err
    {
        if let Ok(source) = std::fs::read_to_string(input_dir.join(file)) {
            return anyhow!(
                "{}\n{}",
                err,
                htmlc_parser::format_error(parse_error, file, &source)
            );
        }
    }
    anyhow::Error::new(err)
}
