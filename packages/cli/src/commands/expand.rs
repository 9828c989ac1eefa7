use super::{patterns_or_default, ConsoleSink};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use htmlc_common::DiagnosticSink;
use htmlc_dom::{normalize, render, Dom, DomError};
use htmlc_expander::{ComponentResolver, TemplateRegistry};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Page template to expand
    pub page: PathBuf,

    /// Component template directories
    #[arg(short, long = "components", required = true)]
    pub components: Vec<PathBuf>,

    /// Glob patterns for component files (defaults to *.html)
    #[arg(short, long = "pattern")]
    pub patterns: Vec<String>,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn expand(args: ExpandArgs, cwd: &Path) -> Result<()> {
    let patterns = patterns_or_default(&args.patterns);
    let mut registry = TemplateRegistry::new();
    for dir in &args.components {
        let dir = cwd.join(dir);
        registry
            .load_dir(&dir, &patterns)
            .with_context(|| format!("failed to load components from {}", dir.display()))?;
    }

    let page = cwd.join(&args.page);
    let source =
        fs::read_to_string(&page).with_context(|| format!("failed to read {}", page.display()))?;

    let mut sink = ConsoleSink::default();
    let html = expand_page(&source, &args.page.display().to_string(), &registry, &mut sink)?;

    match args.out {
        Some(out) => {
            let out = cwd.join(out);
            fs::write(&out, html).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{}", html),
    }

    Ok(())
}

/// Normalize a page, expand its components and render it back to markup
pub fn expand_page(
    source: &str,
    name: &str,
    resolver: &dyn ComponentResolver,
    sink: &mut dyn DiagnosticSink,
) -> Result<String> {
    let mut dom = Dom::new();
    let root = match normalize(&mut dom, source) {
        Ok(root) => root,
        Err(DomError::MalformedFragment {
            source: Some(err), ..
        }) => {
            return Err(anyhow!(
                "failed to parse {}\n{}",
                name,
                htmlc_parser::format_error(&err, name, source)
            ))
        }
        Err(err) => return Err(err).with_context(|| format!("failed to parse {}", name)),
    };

    let root = htmlc_expander::expand(&mut dom, root, resolver, sink)
        .with_context(|| format!("failed to expand {}", name))?;

    Ok(render(&dom, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use htmlc_common::CollectingSink;

    fn registry() -> TemplateRegistry {
        let mut registry = TemplateRegistry::new();
        registry
            .register("Badge", r#"<span class="badge">{{ .Label }}</span>"#)
            .unwrap();
        registry
    }

    #[test]
    fn test_expand_page_replaces_components() {
        let mut sink = CollectingSink::new();
        let html = expand_page(
            r#"<div><Badge label="new"></Badge></div>"#,
            "page.html",
            &registry(),
            &mut sink,
        )
        .unwrap();

        assert!(html.contains("new"));
        assert!(!html.contains("Badge"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_expand_page_names_file_on_unknown_component() {
        let mut sink = CollectingSink::new();
        let err = expand_page("<div><Missing></Missing></div>", "page.html", &registry(), &mut sink)
            .unwrap_err();
        assert!(err.to_string().contains("page.html"));
    }

    #[test]
    fn test_expand_page_reports_syntax_errors() {
        let mut sink = CollectingSink::new();
        let err = expand_page("<p>{{ if .X }}</p>", "broken.html", &registry(), &mut sink)
            .unwrap_err();
        assert!(err.to_string().contains("broken.html"));
    }

    #[test]
    fn test_expand_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("ui")).unwrap();
        fs::write(
            dir.path().join("ui/badge.html"),
            r#"<span class="badge">{{ .Label }}</span>"#,
        )
        .unwrap();
        fs::write(dir.path().join("page.html"), r#"<p><Badge label="hot"></Badge></p>"#).unwrap();

        expand(
            ExpandArgs {
                page: PathBuf::from("page.html"),
                components: vec![PathBuf::from("ui")],
                patterns: vec![],
                out: Some(PathBuf::from("out.html")),
            },
            dir.path(),
        )
        .unwrap();

        let html = fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert!(html.contains("hot"));
        assert!(!html.contains("Badge"));
    }
}
