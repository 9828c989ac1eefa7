use crate::codegen::CodeGenerator;
use crate::naming::to_rust_ident;
use crate::types::{Schema, StructField};

/// Rust declarations with serde derives
pub struct RustGenerator {
    derives: Vec<String>,
}

impl RustGenerator {
    pub fn new() -> Self {
        Self {
            derives: ["Debug", "Clone", "Serialize", "Deserialize"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    fn field_type(&self, field: &StructField) -> String {
        let type_ = self.generate_type(&field.type_);
        if field.optional && !type_.starts_with("Option<") {
            format!("Option<{}>", type_)
        } else {
            type_
        }
    }
}

impl Default for RustGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for RustGenerator {
    fn generate_type(&self, type_: &str) -> String {
        let type_ = type_.trim();

        if let Some(inner) = type_.strip_prefix("[]") {
            return format!("Vec<{}>", self.generate_type(inner));
        }
        if let Some(inner) = type_.strip_prefix('*') {
            return format!("Option<{}>", self.generate_type(inner));
        }
        if let Some(rest) = type_.strip_prefix("map[") {
            if let Some((key, value)) = split_map(rest) {
                return format!(
                    "std::collections::HashMap<{}, {}>",
                    self.generate_type(key),
                    self.generate_type(value)
                );
            }
        }

        match type_ {
            "any" | "interface{}" => "serde_json::Value".to_string(),
            "string" => "String".to_string(),
            "bool" => "bool".to_string(),
            "int" | "int8" | "int16" | "int32" | "int64" | "rune" => "i64".to_string(),
            "uint" | "uint8" | "uint16" | "uint32" | "uint64" | "uintptr" => "u64".to_string(),
            "byte" => "u8".to_string(),
            "float32" | "float64" => "f64".to_string(),
            qualified if qualified.contains('.') && !qualified.contains("::") => {
                qualified.replace('.', "::")
            }
            other => other.to_string(),
        }
    }

    fn generate_field(&self, field: &StructField) -> String {
        let mut lines = vec![format!("#[serde(rename = \"{}\")]", field.json_name)];
        if field.optional {
            lines.push("#[serde(default, skip_serializing_if = \"Option::is_none\")]".to_string());
        }
        lines.push(format!(
            "pub {}: {},",
            to_rust_ident(&field.name),
            self.field_type(field)
        ));
        lines.join("\n")
    }

    fn generate_struct(&self, schema: &Schema) -> String {
        let mut lines = vec![
            format!("/// Parameters of the `{}` template", schema.from_template),
            format!("#[derive({})]", self.derives.join(", ")),
            format!("pub struct {} {{", schema.name),
        ];

        let mut used: Vec<String> = Vec::new();
        for field in &schema.fields {
            let mut declaration = self.generate_field(field);
            let ident = to_rust_ident(&field.name);
            if used.contains(&ident) {
                let unique = format!("{}_{}", ident, used.len());
                declaration = declaration.replace(
                    &format!("pub {}:", ident),
                    &format!("pub {}:", unique),
                );
                used.push(unique);
            } else {
                used.push(ident);
            }
            for line in declaration.lines() {
                lines.push(format!("    {}", line));
            }
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    fn generate_imports(&self, imports: &[String]) -> String {
        imports
            .iter()
            .map(|path| {
                let path = path.replace('/', "::").replace(['-', '.'], "_");
                format!("use {};", path)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Split `K]V` (the part after `map[`) at the bracket closing the key
fn split_map(rest: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' if depth == 0 => return Some((&rest[..i], &rest[i + 1..])),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldSource;

    #[test]
    fn test_generate_primitive_types() {
        let gen = RustGenerator::new();

        assert_eq!(gen.generate_type("any"), "serde_json::Value");
        assert_eq!(gen.generate_type("string"), "String");
        assert_eq!(gen.generate_type("bool"), "bool");
        assert_eq!(gen.generate_type("int"), "i64");
        assert_eq!(gen.generate_type("uint32"), "u64");
        assert_eq!(gen.generate_type("float64"), "f64");
    }

    #[test]
    fn test_generate_composite_types() {
        let gen = RustGenerator::new();

        assert_eq!(gen.generate_type("[]string"), "Vec<String>");
        assert_eq!(gen.generate_type("*int"), "Option<i64>");
        assert_eq!(
            gen.generate_type("map[string][]models.User"),
            "std::collections::HashMap<String, Vec<models::User>>"
        );
        assert_eq!(
            gen.generate_type("map[string]map[string]bool"),
            "std::collections::HashMap<String, std::collections::HashMap<String, bool>>"
        );
        assert_eq!(gen.generate_type("Custom"), "Custom");
    }

    #[test]
    fn test_generate_field() {
        let gen = RustGenerator::new();

        let field = StructField::new("showMessage", "bool", FieldSource::Annotation);
        assert_eq!(
            gen.generate_field(&field),
            "#[serde(rename = \"showMessage\")]\npub show_message: bool,"
        );

        let optional = StructField::new("type?", "string", FieldSource::Annotation);
        let result = gen.generate_field(&optional);
        assert!(result.contains("pub r#type: Option<String>,"));
        assert!(result.contains("skip_serializing_if = \"Option::is_none\""));
    }

    #[test]
    fn test_optional_pointer_is_not_double_wrapped() {
        let gen = RustGenerator::new();
        let field = StructField::new("count?", "*int", FieldSource::Annotation);
        assert!(gen.generate_field(&field).contains("pub count: Option<i64>,"));
    }

    #[test]
    fn test_generate_struct() {
        let gen = RustGenerator::new();
        let schema = Schema {
            name: "Card".into(),
            fields: vec![
                StructField::new("Title", "string", FieldSource::Annotation),
                StructField::new("Body", "any", FieldSource::Usage),
            ],
            imports: vec![],
            from_template: "card".into(),
        };

        let output = gen.generate_struct(&schema);
        assert!(output.contains("#[derive(Debug, Clone, Serialize, Deserialize)]"));
        assert!(output.contains("pub struct Card {"));
        assert!(output.contains("    pub title: String,"));
        assert!(output.contains("    pub body: serde_json::Value,"));
    }

    #[test]
    fn test_generate_imports() {
        let gen = RustGenerator::new();
        let imports = vec!["crate::models".to_string(), "github.com/my-app/types".to_string()];
        assert_eq!(
            gen.generate_imports(&imports),
            "use crate::models;\nuse github_com::my_app::types;"
        );
    }
}
