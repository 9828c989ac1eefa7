//! Rust source for parsed templates.

use crate::context::CompilerContext;
use htmlc_inference::{CodeGenerator, ParsedFile, RustGenerator};

/// Everything printed into one generated module
pub struct FileArgs<'a> {
    pub package: &'a str,
    pub module: &'a str,
    /// Template file the module was generated from
    pub source_name: &'a str,
    pub parsed: &'a ParsedFile,
    /// Name of the entry function, e.g. `parse_card`
    pub parse_func_name: &'a str,
    pub generating_for_components: bool,
}

pub struct InitArgs<'a> {
    pub package: &'a str,
    pub modules: &'a [String],
    pub generating_for_components: bool,
}

/// Raw string literal holding `text` unchanged
pub fn raw_string_literal(text: &str) -> String {
    let mut longest = 0;
    let mut run: Option<usize> = None;
    for c in text.chars() {
        run = match (c, run) {
            ('"', _) => Some(0),
            ('#', Some(n)) => Some(n + 1),
            _ => None,
        };
        if let Some(n) = run {
            longest = longest.max(n);
        }
    }

    let hashes = "#".repeat(longest + 1);
    format!("r{}\"{}\"{}", hashes, text, hashes)
}

pub fn print_file(args: &FileArgs) -> String {
    let ctx = CompilerContext::new();
    let generator = RustGenerator::new();

    ctx.add_line(&format!(
        "//! `{}::{}`, generated by htmlc from `{}`. Do not edit.",
        args.package, args.module, args.source_name
    ));
    ctx.blank_line();
    ctx.add_line("use serde::{Deserialize, Serialize};");
    if !args.parsed.imports.is_empty() {
        ctx.add_line(&generator.generate_imports(&args.parsed.imports));
    }
    ctx.blank_line();

    ctx.add_line("/// Template source, executed by definition name");
    ctx.add("pub const TEMPLATE: &str = ");
    ctx.add(&raw_string_literal(&args.parsed.template_text));
    ctx.add(";\n");

    let primary = args.parsed.primary();

    if args.generating_for_components {
        if let Some(schema) = primary {
            ctx.blank_line();
            ctx.add_line("/// Component tag rendered by this template");
            ctx.add_line(&format!("pub const TAG: &str = \"{}\";", schema.name));
        }
    }

    for schema in &args.parsed.schemas {
        ctx.blank_line();
        ctx.add_line(&generator.generate_struct(schema));
    }

    if let Some(schema) = primary {
        ctx.blank_line();
        ctx.add_line(&format!("/// Decode `{}` parameters from JSON", schema.name));
        ctx.add_line(&format!(
            "pub fn {}(input: &str) -> Result<{}, serde_json::Error> {{",
            args.parse_func_name, schema.name
        ));
        ctx.indent();
        ctx.add_line("serde_json::from_str(input)");
        ctx.dedent();
        ctx.add_line("}");
    }

    ctx.get_output()
}

/// `mod.rs` of an output directory
pub fn print_init(args: &InitArgs) -> String {
    let ctx = CompilerContext::new();

    ctx.add_line(&format!(
        "//! Templates of package `{}`, generated by htmlc. Do not edit.",
        args.package
    ));
    ctx.blank_line();
    for module in args.modules {
        ctx.add_line(&format!("pub mod {};", module));
    }

    if args.generating_for_components {
        ctx.blank_line();
        ctx.add_line("/// Component tags and their template sources");
        ctx.add_line("pub fn component_sources() -> Vec<(&'static str, &'static str)> {");
        ctx.indent();
        if args.modules.is_empty() {
            ctx.add_line("Vec::new()");
        } else {
            ctx.add_line("vec![");
            ctx.indent();
            for module in args.modules {
                ctx.add_line(&format!("({}::TAG, {}::TEMPLATE),", module, module));
            }
            ctx.dedent();
            ctx.add_line("]");
        }
        ctx.dedent();
        ctx.add_line("}");
    }

    ctx.get_output()
}

#[cfg(test)]
mod tests {
    use super::*;
    use htmlc_inference::parse_file;

    #[test]
    fn test_raw_string_literal() {
        assert_eq!(raw_string_literal("<p>hi</p>"), "r#\"<p>hi</p>\"#");
        assert_eq!(
            raw_string_literal(r##"a "# b"##),
            "r##\"a \"# b\"##"
        );
    }

    #[test]
    fn test_print_component_file() {
        let parsed = parse_file(
            "{{- /* @param title string */}}<h1>{{.Title}}</h1>{{.Subtitle}}",
            "Card",
        )
        .unwrap();
        let output = print_file(&FileArgs {
            package: "components",
            module: "card",
            source_name: "card.html",
            parsed: &parsed,
            parse_func_name: "parse_card",
            generating_for_components: true,
        });

        assert!(output.starts_with("//! `components::card`, generated by htmlc from `card.html`."));
        assert!(output.contains("use serde::{Deserialize, Serialize};"));
        assert!(output.contains("pub const TEMPLATE: &str = r#\"{{- define \"Card\"}}"));
        assert!(output.contains("pub const TAG: &str = \"Card\";"));
        assert!(output.contains("pub struct Card {"));
        assert!(output.contains("    #[serde(rename = \"title\")]\n    pub title: String,"));
        assert!(output.contains("    pub subtitle: serde_json::Value,"));
        assert!(output.contains(
            "pub fn parse_card(input: &str) -> Result<Card, serde_json::Error> {\n    serde_json::from_str(input)\n}"
        ));
    }

    #[test]
    fn test_page_file_has_no_tag() {
        let parsed = parse_file("<p>{{.Body}}</p>", "Home").unwrap();
        let output = print_file(&FileArgs {
            package: "pages",
            module: "home",
            source_name: "home.html",
            parsed: &parsed,
            parse_func_name: "parse_home",
            generating_for_components: false,
        });
        assert!(!output.contains("TAG"));
    }

    #[test]
    fn test_print_init() {
        let modules = vec!["button".to_string(), "card".to_string()];
        let output = print_init(&InitArgs {
            package: "components",
            modules: &modules,
            generating_for_components: true,
        });

        assert!(output.contains("pub mod button;\npub mod card;\n"));
        assert!(output.contains("pub fn component_sources() -> Vec<(&'static str, &'static str)> {"));
        assert!(output.contains("        (card::TAG, card::TEMPLATE),"));
    }
}
