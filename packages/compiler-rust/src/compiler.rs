use crate::context::ParseOptions;
use crate::error::{CompileError, CompileResult};
use crate::format::format_or_raw;
use crate::printer::{print_file, print_init, FileArgs, InitArgs};
use htmlc_common::{discover_files, DiagnosticSink};
use htmlc_inference::{parse_file, to_field_name, to_rust_ident};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Struct name used when a template is compiled without a file name
pub const STDOUT_STRUCT_NAME: &str = "YourStdoutStruct";

/// Entry function name used when a template is compiled without a file name
pub const STDOUT_PARSE_FUNC: &str = "parse_stdout";

/// File written into every output directory
pub const INIT_FILE: &str = "mod.rs";

/// Struct name for a template file: its stem, optionally prefixed
pub fn struct_name_for(path: &Path, options: &ParseOptions) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match &options.struct_name_prefix {
        Some(prefix) => to_field_name(&format!("{}{}", prefix, stem)),
        None => to_field_name(&stem),
    }
}

/// Snake-case module name; keywords get a trailing underscore
pub fn module_name(struct_name: &str) -> String {
    let ident = to_rust_ident(struct_name);
    match ident.strip_prefix("r#") {
        Some(keyword) => format!("{}_", keyword),
        None => ident,
    }
}

/// A single template as passed to [`compile_template`]
pub struct TemplateInput<'a> {
    pub content: &'a str,
    /// File name used in diagnostics and the module header
    pub source_name: &'a str,
    pub module: &'a str,
    pub struct_name: &'a str,
    pub parse_func_name: &'a str,
}

/// Generate the module source for one template
pub fn compile_template(
    input: &TemplateInput,
    package: &str,
    options: &ParseOptions,
    sink: &mut dyn DiagnosticSink,
) -> CompileResult<String> {
    let content = match options.pre_process {
        Some(pre_process) => {
            pre_process(input.content).map_err(|message| CompileError::PreProcess {
                file: input.source_name.to_string(),
                message,
            })?
        }
        None => input.content.to_string(),
    };

    let parsed = parse_file(&content, input.struct_name)
        .map_err(|e| CompileError::inference(input.source_name, e))?;
    debug!(
        file = input.source_name,
        schemas = parsed.schemas.len(),
        imports = parsed.imports.len(),
        "parsed template"
    );

    let source = print_file(&FileArgs {
        package,
        module: input.module,
        source_name: input.source_name,
        parsed: &parsed,
        parse_func_name: input.parse_func_name,
        generating_for_components: options.generating_for_components,
    });

    Ok(format_or_raw(source, input.source_name, sink))
}

struct DirEntry {
    relative: PathBuf,
    struct_name: String,
    module: String,
}

/// Generate one module per template under `input_dir` plus a `mod.rs`.
///
/// Stops at the first failing file; modules written before it stay on
/// disk. Returns the written paths, `mod.rs` first.
#[instrument(skip(options, sink))]
pub fn parse_dir(
    input_dir: &Path,
    output_dir: &Path,
    package: &str,
    options: &ParseOptions,
    sink: &mut dyn DiagnosticSink,
) -> CompileResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| CompileError::io(output_dir, e))?;

    let files = discover_files(input_dir, &options.glob_patterns)?;
    let mut entries: Vec<DirEntry> = Vec::with_capacity(files.len());

    for relative in files {
        let struct_name = struct_name_for(&relative, options);
        let base = module_name(&struct_name);
        let mut module = base.clone();
        let mut n = 2;
        while entries.iter().any(|e| e.module == module) || module == "mod" {
            module = format!("{}_{}", base, n);
            n += 1;
        }
        if module != base {
            sink.warn(format!(
                "module name '{}' already taken, using '{}' for {}",
                base,
                module,
                relative.display()
            ));
        }

        entries.push(DirEntry {
            relative,
            struct_name,
            module,
        });
    }

    let mut written = Vec::with_capacity(entries.len() + 1);

    let modules: Vec<String> = entries.iter().map(|e| e.module.clone()).collect();
    let init = print_init(&InitArgs {
        package,
        modules: &modules,
        generating_for_components: options.generating_for_components,
    });
    let init_path = output_dir.join(INIT_FILE);
    let init = format_or_raw(init, INIT_FILE, sink);
    fs::write(&init_path, init).map_err(|e| CompileError::io(&init_path, e))?;
    written.push(init_path);

    for entry in &entries {
        let path = input_dir.join(&entry.relative);
        let content = fs::read_to_string(&path).map_err(|e| CompileError::io(&path, e))?;
        let source_name = entry.relative.to_string_lossy().replace('\\', "/");

        let source = compile_template(
            &TemplateInput {
                content: &content,
                source_name: &source_name,
                module: &entry.module,
                struct_name: &entry.struct_name,
                parse_func_name: &format!("parse_{}", entry.module),
            },
            package,
            options,
            sink,
        )?;

        let out_path = output_dir.join(format!("{}.rs", entry.module));
        fs::write(&out_path, source).map_err(|e| CompileError::io(&out_path, e))?;
        info!(file = %source_name, output = %out_path.display(), "generated module");
        written.push(out_path);
    }

    Ok(written)
}

/// Generate the module source for a single template into `out`
pub fn parse(
    input: &str,
    package: &str,
    options: &ParseOptions,
    out: &mut dyn Write,
    sink: &mut dyn DiagnosticSink,
) -> CompileResult<()> {
    let source = compile_template(
        &TemplateInput {
            content: input,
            source_name: "<stdin>",
            module: "stdout",
            struct_name: STDOUT_STRUCT_NAME,
            parse_func_name: STDOUT_PARSE_FUNC,
        },
        package,
        options,
        sink,
    )?;

    out.write_all(source.as_bytes())
        .map_err(|e| CompileError::io("<stdout>", e))
}
