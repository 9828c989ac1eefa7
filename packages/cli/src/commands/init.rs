use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config and example files
    #[arg(short, long)]
    pub force: bool,
}

const EXAMPLE_FILES: &[(&str, &str)] = &[
    (
        "components/card.html",
        r#"{{- define "Card" }}
{{/* @param Title string */}}
{{/* @param Footer? string */}}
<section class="card">
  <h2>{{ .Title }}</h2>
  {{ children }}
  {{- if .Footer }}
  <footer>{{ .Footer }}</footer>
  {{- end }}
</section>
{{- end }}
"#,
    ),
    (
        "components/page-head.html",
        r#"<title>{{ .Title }}</title>
<meta name="description" content="{{ .Description }}">
"#,
    ),
    (
        "pages/index.html",
        r#"<html>
  <head>
    <meta charset="utf-8">
  </head>
  <body>
    <PageHead title="Home" description="An htmlc example page"></PageHead>
    <Card title="Hello">
      <p>Welcome back, {{ .User.Name }}.</p>
    </Card>
  </body>
</html>
"#,
    ),
];

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if !args.force {
        let existing: Vec<&str> = [DEFAULT_CONFIG_NAME, "components", "pages"]
            .into_iter()
            .filter(|name| cwd.join(name).exists())
            .collect();
        if !existing.is_empty() {
            return Err(anyhow!(
                "htmlc is already initialized ({} already exists), use --force to overwrite",
                existing.join(", ")
            ));
        }
    }

    println!("{}", "Initializing htmlc project...".bright_blue().bold());

    for (relative, content) in EXAMPLE_FILES {
        let path = cwd.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        println!("  {} Created {}", "✓".green(), relative);
    }

    let config_json = serde_json::to_string_pretty(&Config::default())?;
    fs::write(&config_path, config_json)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit components/card.html and pages/index.html");
    println!("  2. Run: htmlc generate");
    println!("  3. Check output in generated/");

    Ok(())
}
