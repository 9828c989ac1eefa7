pub mod rust;

use crate::types::{Schema, StructField};

/// Emits declarations for inferred schemas in one target language
pub trait CodeGenerator {
    /// Target spelling of a semantic type such as `[]string`
    fn generate_type(&self, type_: &str) -> String;

    /// One field declaration, attributes included
    fn generate_field(&self, field: &StructField) -> String;

    /// A complete struct declaration
    fn generate_struct(&self, schema: &Schema) -> String;

    /// Import lines for the schema's package-qualified types
    fn generate_imports(&self, imports: &[String]) -> String;
}
