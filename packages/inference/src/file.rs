use crate::error::InferenceResult;
use crate::inference::InferenceEngine;
use crate::types::Schema;
use htmlc_parser::{parse, rewrite_param_comments};
use tracing::debug;

/// Everything extracted from one template file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Template text to embed in generated code. A file without definitions
    /// is wrapped in one named after the default struct.
    pub template_text: String,
    /// Import paths of all schemas, first-seen order
    pub imports: Vec<String>,
    /// One schema per definition, in definition order
    pub schemas: Vec<Schema>,
}

impl ParsedFile {
    /// Schema of the first definition; the one entry functions decode into
    pub fn primary(&self) -> Option<&Schema> {
        self.schemas.first()
    }
}

/// Extract schemas from a template file
pub fn parse_file(content: &str, default_struct_name: &str) -> InferenceResult<ParsedFile> {
    parse_file_with(&InferenceEngine::default(), content, default_struct_name)
}

pub fn parse_file_with(
    engine: &InferenceEngine,
    content: &str,
    default_struct_name: &str,
) -> InferenceResult<ParsedFile> {
    let rewritten = rewrite_param_comments(content);
    let set = parse(&rewritten)?;

    if !set.has_definitions() {
        debug!(name = default_struct_name, "wrapping template without definitions");
        let wrapped = format!(
            "{{{{- define \"{}\"}}}}\n{}\n\n{{{{- end }}}}",
            default_struct_name, content
        );
        return parse_file_with(engine, &wrapped, default_struct_name);
    }

    let mut schemas = Vec::with_capacity(set.definitions.len());
    let mut imports: Vec<String> = Vec::new();

    for definition in &set.definitions {
        let schema = engine.infer_definition(definition)?;
        for import in &schema.imports {
            if !imports.contains(import) {
                imports.push(import.clone());
            }
        }
        schemas.push(schema);
    }

    Ok(ParsedFile {
        template_text: content.to_string(),
        imports,
        schemas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_plain_template() {
        let parsed = parse_file("<p>{{.Title}}</p>", "Card").unwrap();
        assert_eq!(
            parsed.template_text,
            "{{- define \"Card\"}}\n<p>{{.Title}}</p>\n\n{{- end }}"
        );
        assert_eq!(parsed.schemas.len(), 1);
        assert_eq!(parsed.schemas[0].name, "Card");
        assert_eq!(parsed.schemas[0].from_template, "Card");
    }

    #[test]
    fn test_keeps_original_text() {
        let source = "{{define \"a\"}}{{/* @param X string */}}{{.X}}{{end}}";
        let parsed = parse_file(source, "Unused").unwrap();
        assert_eq!(parsed.template_text, source);
        assert_eq!(parsed.schemas[0].fields[0].type_, "string");
    }

    #[test]
    fn test_one_schema_per_definition() {
        let source = r#"{{define "list"}}{{range .Items}}{{template "item" .}}{{end}}{{end}}
{{define "item"}}{{.Label}}{{end}}"#;
        let parsed = parse_file(source, "Unused").unwrap();
        let names: Vec<_> = parsed.schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["List", "Item"]);
        assert_eq!(parsed.primary().map(|s| s.name.as_str()), Some("List"));
    }

    #[test]
    fn test_imports_are_merged_across_definitions() {
        let source = r#"{{define "a"}}{{/* @param U models.User */}}{{end}}
{{define "b"}}{{/* @param U models.User */}}{{/* @param T time.Time */}}{{end}}"#;
        let parsed = parse_file(source, "Unused").unwrap();
        assert_eq!(parsed.imports, vec!["models", "time"]);
    }
}
