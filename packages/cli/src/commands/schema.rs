use super::{describe_compile_error, ConsoleSink};
use anyhow::{Context, Result};
use clap::Args;
use htmlc_compiler_rust::{
    compile_template, module_name, parse, struct_name_for, ParseOptions, TemplateInput,
};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Template file, or `-` for stdin
    pub file: PathBuf,

    /// Directory to write `<module>.rs` into instead of printing to stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Package name written into the module header
    #[arg(short, long, default_value = "templates")]
    pub pkg: String,

    /// Also emit the component `TAG` constant
    #[arg(long)]
    pub component: bool,
}

pub fn schema(args: SchemaArgs, cwd: &Path) -> Result<()> {
    let options = if args.component {
        ParseOptions::components()
    } else {
        ParseOptions::default()
    };
    let mut sink = ConsoleSink::default();

    if args.file.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read template from stdin")?;
        let mut stdout = std::io::stdout();
        return parse(&input, &args.pkg, &options, &mut stdout, &mut sink)
            .context("failed to generate schema for stdin");
    }

    let path = cwd.join(&args.file);
    let content =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| args.file.display().to_string());
    let base = path.parent().unwrap_or(cwd);

    let struct_name = struct_name_for(Path::new(&file_name), &options);
    let module = module_name(&struct_name);
    let source = compile_template(
        &TemplateInput {
            content: &content,
            source_name: &file_name,
            module: &module,
            struct_name: &struct_name,
            parse_func_name: &format!("parse_{}", module),
        },
        &args.pkg,
        &options,
        &mut sink,
    )
    .map_err(|err| describe_compile_error(err, base))?;

    match args.out {
        Some(out) => {
            let out = cwd.join(out);
            fs::create_dir_all(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let target = out.join(format!("{}.rs", module));
            fs::write(&target, source)
                .with_context(|| format!("failed to write {}", target.display()))?;
            println!("{}", target.display());
        }
        None => print!("{}", source),
    }

    Ok(())
}
