//! # htmlc inference
//!
//! Builds typed parameter schemas from template syntax trees.
//!
//! Every field a template reads (`{{.User.Name}}`) becomes a schema field of
//! type `any`. `@param` comments refine them:
//!
//! ```text
//! {{- /* @param Users []models.User */}}
//! {{- /* @param title? string */}}
//! ```
//!
//! A trailing `?` marks the field optional. Package-qualified types record
//! their package as an import.
//!
//! ## Example
//!
//! ```rust
//! use htmlc_inference::{parse_file, CodeGenerator, RustGenerator};
//!
//! let source = r#"{{- /* @param Name string */}}<h1>{{.Name}}</h1>{{if .Admin}}!{{end}}"#;
//! let parsed = parse_file(source, "Header").unwrap();
//!
//! let schema = &parsed.schemas[0];
//! assert_eq!(schema.name, "Header");
//! assert_eq!(schema.fields[0].type_, "string");
//! assert_eq!(schema.fields[1].type_, "any");
//!
//! let code = RustGenerator::new().generate_struct(schema);
//! assert!(code.contains("pub name: String,"));
//! ```

pub mod codegen;
pub mod collector;
pub mod error;
pub mod file;
pub mod inference;
pub mod naming;
pub mod options;
pub mod types;

pub use codegen::{rust::RustGenerator, CodeGenerator};
pub use collector::{split_qualified, VariableCollector};
pub use error::{InferenceError, InferenceResult};
pub use file::{parse_file, parse_file_with, ParsedFile};
pub use inference::{infer, InferenceEngine};
pub use naming::{to_field_name, to_rust_ident, to_snake_case, to_struct_name};
pub use options::InferenceOptions;
pub use types::{FieldSource, Schema, StructField};
