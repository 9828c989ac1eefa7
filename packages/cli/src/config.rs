use anyhow::{anyhow, Context, Result};
use htmlc_common::resolve_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "htmlc.config.json";

/// htmlc configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Component template directories, each compiled in component mode
    #[serde(default)]
    pub components: Vec<ComponentsConfig>,

    /// Page templates expanded against the components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<PagesConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsConfig {
    pub dir: String,

    /// Glob patterns matched against file base names, recursively
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,

    /// Where the component modules go; `<pages output>/components` by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagesConfig {
    pub input: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,

    pub output: PagesOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagesOutput {
    pub dir: String,
    /// Package name written into generated module headers
    pub pkg: String,
}

impl Config {
    /// Load a config file and resolve its relative paths against the
    /// directory holding it
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(anyhow!(
                "failed to find htmlc configuration file {}",
                path.display()
            ));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        config.validate()?;

        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config.resolved(&base))
    }

    fn validate(&self) -> Result<()> {
        for (i, components) in self.components.iter().enumerate() {
            if components.dir.is_empty() {
                return Err(anyhow!("components[{}].dir is required", i));
            }
        }
        if let Some(pages) = &self.pages {
            if pages.input.is_empty() {
                return Err(anyhow!("pages.input is required"));
            }
            if pages.output.dir.is_empty() {
                return Err(anyhow!("pages.output.dir is required"));
            }
            if pages.output.pkg.is_empty() {
                return Err(anyhow!("pages.output.pkg is required"));
            }
        }
        Ok(())
    }

    /// Same config with every path made absolute against `base`
    pub fn resolved(mut self, base: &Path) -> Self {
        let resolve = |p: &str| resolve_path(base, p).display().to_string();

        for components in &mut self.components {
            components.dir = resolve(&components.dir);
            if let Some(output) = &components.output {
                components.output = Some(resolve(output));
            }
        }
        if let Some(pages) = &mut self.pages {
            pages.input = resolve(&pages.input);
            pages.output.dir = resolve(&pages.output.dir);
        }
        self
    }

    /// Output directory of the component modules of `components`
    pub fn components_output(&self, components: &ComponentsConfig) -> Option<PathBuf> {
        match &components.output {
            Some(output) => Some(PathBuf::from(output)),
            None => self
                .pages
                .as_ref()
                .map(|pages| PathBuf::from(&pages.output.dir).join("components")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            components: vec![ComponentsConfig {
                dir: "components".to_string(),
                patterns: vec!["*.html".to_string()],
                output: None,
            }],
            pages: Some(PagesConfig {
                input: "pages".to_string(),
                patterns: vec!["*.html".to_string()],
                output: PagesOutput {
                    dir: "generated".to_string(),
                    pkg: "pages".to_string(),
                },
            }),
        }
    }
}
