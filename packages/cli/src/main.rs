mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    expand, generate, init, schema, ExpandArgs, GenerateArgs, InitArgs, SchemaArgs,
};
use tracing_subscriber::EnvFilter;

/// htmlc - typed component templates for HTML
#[derive(Parser, Debug)]
#[command(name = "htmlc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logs
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file with example components and pages
    Init(InitArgs),

    /// Generate Rust modules for components and expanded pages
    Generate(GenerateArgs),

    /// Print the Rust schema of a single template
    Schema(SchemaArgs),

    /// Expand the components of a page and print the result
    Expand(ExpandArgs),
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot get current directory")?;

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Generate(args) => generate(args, &cwd),
        Command::Schema(args) => schema(args, &cwd),
        Command::Expand(args) => expand(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_expand_arguments() {
        let cli = Cli::parse_from([
            "htmlc",
            "--debug",
            "expand",
            "pages/index.html",
            "--components",
            "ui",
            "--components",
            "layout",
        ]);
        assert!(cli.debug);
        match cli.command {
            Command::Expand(args) => {
                assert_eq!(args.components.len(), 2);
                assert!(args.out.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_generate_uses_default_config_name() {
        let cli = Cli::parse_from(["htmlc", "generate"]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.config, std::path::PathBuf::from(config::DEFAULT_CONFIG_NAME))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
