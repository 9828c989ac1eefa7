use crate::naming::to_field_name;
use serde::{Deserialize, Serialize};

/// Where a field's current type came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldSource {
    /// Referenced as `.Name` in the template
    Usage,
    /// Declared with a `@param` comment
    Annotation,
}

/// One template variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructField {
    /// Exported identifier, e.g. `ShowMessage`
    pub name: String,
    /// Raw name without the optionality marker, e.g. `showMessage`
    pub json_name: String,
    /// Semantic type such as `any`, `string`, `[]models.User`
    #[serde(rename = "type")]
    pub type_: String,
    /// Import path when the type is package-qualified
    pub package: Option<String>,
    pub optional: bool,
    pub source: FieldSource,
}

impl StructField {
    /// Build a field from a raw variable name; a trailing `?` marks it optional
    pub fn new(raw_name: &str, type_: impl Into<String>, source: FieldSource) -> Self {
        let optional = raw_name.ends_with('?');
        let json_name = raw_name.strip_suffix('?').unwrap_or(raw_name).to_string();

        Self {
            name: to_field_name(raw_name),
            json_name,
            type_: type_.into(),
            package: None,
            optional,
            source,
        }
    }

    pub fn is_required(&self) -> bool {
        !self.optional
    }
}

/// Ordered, typed parameter description for one template definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub name: String,
    pub fields: Vec<StructField>,
    /// Import paths in first-seen order, without duplicates
    pub imports: Vec<String>,
    /// Name of the definition this schema was inferred from
    pub from_template: String,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look a field up by its raw (json) name or its exported name
    pub fn field_by_key(&self, key: &str) -> Option<&StructField> {
        self.fields
            .iter()
            .find(|f| f.json_name == key)
            .or_else(|| self.field(&to_field_name(key)))
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &StructField> {
        self.fields.iter().filter(|f| f.is_required())
    }
}
