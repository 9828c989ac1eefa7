use crate::component::{ComponentResolver, Renderer};
use crate::error::{RegistryError, ResolveError};
use crate::partial::{Props, TemplateRenderer};
use htmlc_common::discover_files;
use htmlc_dom::Attributes;
use htmlc_inference::{parse_file_with, to_field_name, InferenceEngine, InferenceError, Schema};
use htmlc_parser::ast::{Definition, TemplateSet};
use htmlc_parser::{parse, rewrite_param_comments};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

struct ComponentTemplate {
    name: String,
    path: Option<PathBuf>,
    set: TemplateSet,
}

/// Component templates addressable by tag.
///
/// A template file is registered under its struct name and under the name
/// of each of its definitions. The struct name selects the first
/// definition.
#[derive(Default)]
pub struct TemplateRegistry {
    engine: InferenceEngine,
    templates: Vec<ComponentTemplate>,
    /// tag -> (template index, definition index)
    tags: IndexMap<String, (usize, usize)>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every template under `dir` matching `patterns`
    pub fn from_dir(dir: &Path, patterns: &[String]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.load_dir(dir, patterns)?;
        Ok(registry)
    }

    /// Register the templates under `dir`; returns how many files were read
    pub fn load_dir(&mut self, dir: &Path, patterns: &[String]) -> Result<usize, RegistryError> {
        let files = discover_files(dir, patterns)?;

        for relative in &files {
            let path = dir.join(relative);
            let content = fs::read_to_string(&path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            self.register(&to_field_name(&stem), &content)?;
            if let Some(template) = self.templates.last_mut() {
                template.path = Some(path);
            }
        }

        info!(dir = %dir.display(), count = files.len(), "loaded component templates");
        Ok(files.len())
    }

    /// Register one template under `name` and its definition names
    pub fn register(&mut self, name: &str, content: &str) -> Result<(), RegistryError> {
        let to_registry_error = |source: InferenceError| RegistryError::Inference {
            name: name.to_string(),
            source,
        };

        let parsed = parse_file_with(&self.engine, content, name).map_err(to_registry_error)?;
        let rewritten = rewrite_param_comments(&parsed.template_text);
        let set = parse(&rewritten)
            .map_err(InferenceError::from)
            .map_err(to_registry_error)?;

        let index = self.templates.len();
        self.insert_tag(name, index, 0);
        for (position, definition) in set.definitions.iter().enumerate() {
            self.insert_tag(&definition.name, index, position);
        }

        self.templates.push(ComponentTemplate {
            name: name.to_string(),
            path: None,
            set,
        });
        Ok(())
    }

    fn insert_tag(&mut self, tag: &str, template: usize, definition: usize) {
        if let Some(previous) = self.tags.insert(tag.to_string(), (template, definition)) {
            if previous != (template, definition) {
                debug!(tag, "component tag redefined");
            }
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Registered tags in registration order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// File a tag was loaded from
    pub fn path(&self, tag: &str) -> Option<&Path> {
        self.lookup_template(tag)
            .and_then(|(template, _)| template.path.as_deref())
    }

    /// Struct name of the template providing `tag`
    pub fn component_name(&self, tag: &str) -> Option<&str> {
        self.lookup_template(tag)
            .map(|(template, _)| template.name.as_str())
    }

    pub fn definition(&self, tag: &str) -> Option<&Definition> {
        self.lookup_template(tag)
            .and_then(|(template, position)| template.set.definitions.get(position))
    }

    /// Schema of the definition a tag renders
    pub fn schema(&self, tag: &str) -> Option<Result<Schema, InferenceError>> {
        self.definition(tag)
            .map(|definition| self.engine.infer_definition(definition))
    }

    fn lookup(&self, tag: &str) -> Option<(usize, usize)> {
        self.tags.get(tag).copied().or_else(|| {
            self.tags
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(tag))
                .map(|(_, entry)| *entry)
        })
    }

    fn lookup_template(&self, tag: &str) -> Option<(&ComponentTemplate, usize)> {
        let (template, position) = self.lookup(tag)?;
        self.templates.get(template).map(|t| (t, position))
    }
}

/// Match attributes to schema fields by json name, then exported name,
/// then json name ignoring case. The first attribute bound to a field wins.
pub fn bind_props(tag: &str, schema: &Schema, attributes: &Attributes) -> (Props, Vec<String>) {
    let mut props = Props::new();

    for (key, value) in attributes {
        let field = schema.field_by_key(key).or_else(|| {
            schema
                .fields
                .iter()
                .find(|field| field.json_name.eq_ignore_ascii_case(key))
        });
        if let Some(field) = field {
            props
                .entry(field.name.clone())
                .or_insert_with(|| value.clone());
        }
    }

    let warnings = schema
        .required_fields()
        .filter(|field| !props.contains_key(&field.name))
        .map(|field| {
            format!(
                "component <{}> is missing required prop '{}'",
                tag, field.json_name
            )
        })
        .collect();

    (props, warnings)
}

impl ComponentResolver for TemplateRegistry {
    fn resolve(
        &self,
        tag: &str,
        attributes: &Attributes,
    ) -> Result<Box<dyn Renderer + '_>, ResolveError> {
        let definition = self
            .definition(tag)
            .ok_or_else(|| ResolveError::not_found(tag))?;
        let schema = self.engine.infer_definition(definition)?;
        let (props, warnings) = bind_props(tag, &schema, attributes);

        debug!(tag, props = props.len(), "resolved template component");
        Ok(Box::new(TemplateRenderer::new(definition, props, warnings)))
    }
}
