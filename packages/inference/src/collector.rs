use crate::options::InferenceOptions;
use crate::types::{FieldSource, Schema, StructField};
use tracing::debug;

/// Accumulates variables reported by the tree walk and assembles them into
/// a [`Schema`].
///
/// Usages keep first-seen order. Annotations are kept apart until
/// [`finish`](Self::finish) so that one declared before the first usage
/// refines that usage instead of taking its slot.
pub struct VariableCollector<'a> {
    options: &'a InferenceOptions,
    usages: Vec<StructField>,
    annotations: Vec<StructField>,
}

impl<'a> VariableCollector<'a> {
    pub fn new(options: &'a InferenceOptions) -> Self {
        Self {
            options,
            usages: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn on_variable_found(&mut self, field: StructField, is_annotation: bool) {
        if self.options.is_reserved(&field.name) {
            return;
        }

        let bucket = if is_annotation {
            &mut self.annotations
        } else {
            &mut self.usages
        };

        if bucket.iter().any(|existing| existing.name == field.name) {
            return;
        }
        bucket.push(field);
    }

    pub fn finish(self, name: impl Into<String>, from_template: impl Into<String>) -> Schema {
        let mut fields = self.usages;
        let mut imports: Vec<String> = Vec::new();

        for mut annotation in self.annotations {
            if let Some((package, type_)) = split_qualified(&annotation.type_) {
                if !imports.contains(&package) {
                    imports.push(package.clone());
                }
                annotation.package = Some(package);
                annotation.type_ = type_;
            }

            match fields.iter_mut().find(|f| f.name == annotation.name) {
                Some(existing) => {
                    debug!(field = %existing.name, type_ = %annotation.type_, "annotation refines field");
                    existing.type_ = annotation.type_;
                    existing.package = annotation.package;
                    existing.optional = annotation.optional;
                    existing.json_name = annotation.json_name;
                    existing.source = FieldSource::Annotation;
                }
                None => fields.push(annotation),
            }
        }

        Schema {
            name: name.into(),
            fields,
            imports,
            from_template: from_template.into(),
        }
    }
}

/// Split a package-qualified type into its import path and the type as it
/// reads once the import is in scope.
///
/// `[]github.com/acme/models.User` gives `("github.com/acme/models", "[]models.User")`.
pub fn split_qualified(type_: &str) -> Option<(String, String)> {
    let dot = type_.rfind('.')?;
    let head = &type_[..dot];
    let start = head.rfind(|c: char| c == ']' || c == '*').map_or(0, |i| i + 1);
    let path = &head[start..];
    if path.is_empty() {
        return None;
    }

    let base = path
        .rsplit('/')
        .next()
        .and_then(|last| last.rsplit("::").next())
        .unwrap_or(path);

    Some((
        path.to_string(),
        format!("{}{}.{}", &type_[..start], base, &type_[dot + 1..]),
    ))
}
