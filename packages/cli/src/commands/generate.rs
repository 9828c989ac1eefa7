use super::expand::expand_page;
use super::{describe_compile_error, patterns_or_default, ConsoleSink};
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use htmlc_common::{discover_files, DiagnosticSink};
use htmlc_compiler_rust::{parse_dir, ParseOptions};
use htmlc_expander::TemplateRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Subdirectory of the pages output holding the expanded page markup
pub const EXPANDED_PAGES_DIR: &str = "html";

const COMPONENTS_PACKAGE: &str = "components";

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Path to the config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
    pub config: PathBuf,
}

pub fn generate(args: GenerateArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(&cwd.join(&args.config))?;

    println!("{}", "Generating htmlc sources...".bright_blue().bold());

    let mut sink = ConsoleSink::default();
    let written = run_generate(&config, &mut sink)?;

    for path in &written {
        let shown = path.strip_prefix(cwd).unwrap_or(path);
        println!("  {} {}", "✓".green(), shown.display());
    }

    println!();
    if sink.warnings == 0 {
        println!("{} Generated {} files", "Done.".green().bold(), written.len());
    } else {
        println!(
            "{} Generated {} files, {} warnings",
            "Done.".yellow().bold(),
            written.len(),
            sink.warnings
        );
    }

    Ok(())
}

/// Compile every component directory, then expand and compile the pages.
///
/// Returns the written files in write order.
pub fn run_generate(config: &Config, sink: &mut dyn DiagnosticSink) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut outputs: Vec<PathBuf> = Vec::new();

    for components in &config.components {
        let dir = Path::new(&components.dir);
        let output = config.components_output(components).ok_or_else(|| {
            anyhow!(
                "no output directory for components in {}, set `output` or configure `pages`",
                dir.display()
            )
        })?;
        if outputs.contains(&output) {
            return Err(anyhow!(
                "several component directories write to {}, set `output` on one of them",
                output.display()
            ));
        }

        debug!(dir = %dir.display(), "parsing components directory");
        let options = ParseOptions::components().with_patterns(components.patterns.clone());
        let files = parse_dir(dir, &output, COMPONENTS_PACKAGE, &options, sink)
            .map_err(|err| describe_compile_error(err, dir))?;
        written.extend(files);
        outputs.push(output);
    }

    let Some(pages) = &config.pages else {
        return Ok(written);
    };

    let mut registry = TemplateRegistry::new();
    for components in &config.components {
        let dir = Path::new(&components.dir);
        registry
            .load_dir(dir, &patterns_or_default(&components.patterns))
            .with_context(|| format!("failed to load components from {}", dir.display()))?;
    }

    info!("generating pages");
    let input = Path::new(&pages.input);
    let output = Path::new(&pages.output.dir);
    let expanded_dir = output.join(EXPANDED_PAGES_DIR);
    if expanded_dir.exists() {
        fs::remove_dir_all(&expanded_dir)
            .with_context(|| format!("failed to clear {}", expanded_dir.display()))?;
    }

    let patterns = patterns_or_default(&pages.patterns);
    let files = discover_files(input, &patterns)
        .with_context(|| format!("failed to list pages in {}", input.display()))?;

    for relative in &files {
        let path = input.join(relative);
        let source = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = relative.display().to_string();
        let html = expand_page(&source, &name, &registry, sink)?;

        let target = expanded_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&target, html).with_context(|| format!("failed to write {}", target.display()))?;
        written.push(target);
    }

    let options = ParseOptions::default().with_patterns(patterns);
    let files = parse_dir(&expanded_dir, output, &pages.output.pkg, &options, sink)
        .map_err(|err| describe_compile_error(err, &expanded_dir))?;
    written.extend(files);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentsConfig, PagesConfig, PagesOutput};
    use htmlc_common::CollectingSink;

    const CARD: &str = r#"{{- define "Card" }}
{{/* @param Title string */}}
<section class="card">
  <h2>{{ .Title }}</h2>
  {{ children }}
</section>
{{- end }}
"#;

    const INDEX: &str = r#"<html>
  <head><meta charset="utf-8"></head>
  <body>
    <Card title="Hello"><p>Welcome back, {{ .User.Name }}.</p></Card>
  </body>
</html>
"#;

    fn project() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("components")).unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("components/card.html"), CARD).unwrap();
        fs::write(dir.path().join("pages/index.html"), INDEX).unwrap();

        let config = Config {
            components: vec![ComponentsConfig {
                dir: "components".to_string(),
                patterns: vec![],
                output: None,
            }],
            pages: Some(PagesConfig {
                input: "pages".to_string(),
                patterns: vec![],
                output: PagesOutput {
                    dir: "out".to_string(),
                    pkg: "site".to_string(),
                },
            }),
        }
        .resolved(dir.path());
        (dir, config)
    }

    #[test]
    fn test_generate_components_and_pages() {
        let (dir, config) = project();
        let mut sink = CollectingSink::new();

        let written = run_generate(&config, &mut sink).unwrap();

        let out = dir.path().join("out");
        assert!(written.contains(&out.join("components/mod.rs")));
        assert!(written.contains(&out.join("components/card.rs")));
        assert!(written.contains(&out.join("html/index.html")));
        assert!(written.contains(&out.join("index.rs")));

        let card = fs::read_to_string(out.join("components/card.rs")).unwrap();
        assert!(card.contains("pub const TAG: &str = \"Card\";"));

        let html = fs::read_to_string(out.join("html/index.html")).unwrap();
        assert!(html.contains("Hello"));
        assert!(html.contains("Welcome back"));
        assert!(!html.contains("<Card"));

        let page = fs::read_to_string(out.join("index.rs")).unwrap();
        assert!(page.contains("pub struct Index"));
        assert!(page.contains("pub fn parse_index"));
        assert!(page.contains("rename = \"User\""));
    }

    #[test]
    fn test_generate_components_only() {
        let (dir, mut config) = project();
        config.components[0].output = Some(dir.path().join("gen").display().to_string());
        config.pages = None;

        let written = run_generate(&config, &mut CollectingSink::new()).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("gen/mod.rs"), dir.path().join("gen/card.rs")]
        );
    }

    #[test]
    fn test_generate_rejects_shared_component_output() {
        let (_dir, mut config) = project();
        let duplicate = config.components[0].clone();
        config.components.push(duplicate);

        let err = run_generate(&config, &mut CollectingSink::new()).unwrap_err();
        assert!(err.to_string().contains("several component directories"));
    }

    #[test]
    fn test_generate_fails_on_unknown_component() {
        let (dir, config) = project();
        fs::write(
            dir.path().join("pages/about.html"),
            "<div><Unknown></Unknown></div>",
        )
        .unwrap();

        let err = run_generate(&config, &mut CollectingSink::new()).unwrap_err();
        assert!(err.to_string().contains("about.html"));
    }
}
