use crate::{
    compile_template, format_source, module_name, parse, struct_name_for, CompileError,
    ParseOptions, TemplateInput,
};
use htmlc_common::{CollectingSink, NullSink};
use std::path::Path;

fn compile(content: &str, options: &ParseOptions) -> String {
    compile_template(
        &TemplateInput {
            content,
            source_name: "test.html",
            module: "test",
            struct_name: "Test",
            parse_func_name: "parse_test",
        },
        "pages",
        options,
        &mut NullSink,
    )
    .unwrap()
}

#[test]
fn test_generated_source_parses() {
    let output = compile(
        r#"{{- /* @param Users []crate::models.User */}}
{{- /* @param type? string */}}
<ul>{{range .Users}}<li>{{.Name}}</li>{{end}}</ul>{{.Footer}}"#,
        &ParseOptions::default(),
    );

    assert!(format_source(&output).is_ok());
    assert!(output.contains("use crate::models;"));
    assert!(output.contains("pub users: Vec<models::User>,"));
    assert!(output.contains("pub r#type: Option<String>,"));
    assert!(output.contains("pub footer: serde_json::Value,"));
    assert!(output.ends_with("}\n"));
}

#[test]
fn test_pre_process_runs_first() {
    fn upper_fields(source: &str) -> Result<String, String> {
        Ok(source.replace(".title", ".Title"))
    }

    let options = ParseOptions {
        pre_process: Some(upper_fields),
        ..ParseOptions::default()
    };
    let output = compile("<h1>{{.title}}</h1>", &options);
    assert!(output.contains("<h1>{{.Title}}</h1>"));
    assert!(output.contains("#[serde(rename = \"Title\")]"));
}

#[test]
fn test_pre_process_failure() {
    fn reject(_: &str) -> Result<String, String> {
        Err("unsupported".to_string())
    }

    let options = ParseOptions {
        pre_process: Some(reject),
        ..ParseOptions::default()
    };
    let err = compile_template(
        &TemplateInput {
            content: "<p></p>",
            source_name: "bad.html",
            module: "bad",
            struct_name: "Bad",
            parse_func_name: "parse_bad",
        },
        "pages",
        &options,
        &mut NullSink,
    )
    .unwrap_err();
    assert!(matches!(err, CompileError::PreProcess { ref file, .. } if file == "bad.html"));
}

#[test]
fn test_bad_annotation_names_the_file() {
    let err = compile_template(
        &TemplateInput {
            content: "{{if .X}}",
            source_name: "broken.html",
            module: "broken",
            struct_name: "Broken",
            parse_func_name: "parse_broken",
        },
        "pages",
        &ParseOptions::default(),
        &mut NullSink,
    )
    .unwrap_err();
    assert!(err.to_string().contains("broken.html"));
}

#[test]
fn test_unparseable_output_falls_back_to_raw() {
    let mut sink = CollectingSink::new();
    let output = compile_template(
        &TemplateInput {
            content: "<p>{{.Name}}</p>",
            source_name: "odd.html",
            module: "odd",
            struct_name: "Not A Struct",
            parse_func_name: "parse_odd",
        },
        "pages",
        &ParseOptions::default(),
        &mut sink,
    )
    .unwrap();

    assert!(output.contains("pub struct Not A Struct {"));
    assert_eq!(sink.warnings().count(), 1);
}

#[test]
fn test_parse_to_writer() {
    let mut out = Vec::new();
    parse(
        "<p>{{.Message}}</p>",
        "main",
        &ParseOptions::default(),
        &mut out,
        &mut NullSink,
    )
    .unwrap();

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("pub struct YourStdoutStruct {"));
    assert!(output.contains(
        "pub fn parse_stdout(input: &str) -> Result<YourStdoutStruct, serde_json::Error> {"
    ));
    assert!(output.contains("{{- define \"YourStdoutStruct\"}}"));
}

#[test]
fn test_struct_and_module_names() {
    let options = ParseOptions::default();
    assert_eq!(struct_name_for(Path::new("ui/text-input.html"), &options), "TextInput");

    let prefixed = ParseOptions {
        struct_name_prefix: Some("page-".to_string()),
        ..ParseOptions::default()
    };
    assert_eq!(struct_name_for(Path::new("home.html"), &prefixed), "PageHome");

    assert_eq!(module_name("TextInput"), "text_input");
    assert_eq!(module_name("Type"), "type_");
}
