use htmlc_inference::{parse_file, CodeGenerator, FieldSource, RustGenerator};

const PROFILE: &str = r#"{{- define "user/profile" }}
{{- /* @param User crate::models.User */}}
{{- /* @param compact? bool */}}
<section class="profile">
  <h2>{{ .User.DisplayName }}</h2>
  {{- if .Compact }}
    <small>{{ .Tagline }}</small>
  {{- else }}
    <p>{{ .Bio | html }}</p>
  {{- end }}
  {{- range $i, $tag := .Tags }}<span>{{ $tag }}</span>{{ end }}
</section>
{{- end }}"#;

#[test]
fn test_profile_schema() {
    let parsed = parse_file(PROFILE, "Unused").unwrap();
    let schema = parsed.primary().unwrap();

    assert_eq!(schema.name, "UserProfile");
    assert_eq!(schema.from_template, "user/profile");

    let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["User", "DisplayName", "Compact", "Tagline", "Bio", "Tags"]
    );

    let user = schema.field("User").unwrap();
    assert_eq!(user.type_, "models.User");
    assert_eq!(user.source, FieldSource::Annotation);

    let compact = schema.field_by_key("compact").unwrap();
    assert!(compact.optional);
    assert_eq!(compact.type_, "bool");

    assert_eq!(parsed.imports, vec!["crate::models"]);
}

#[test]
fn test_profile_rust_output() {
    let parsed = parse_file(PROFILE, "Unused").unwrap();
    let gen = RustGenerator::new();

    let code = gen.generate_struct(parsed.primary().unwrap());
    assert!(code.contains("pub struct UserProfile {"));
    assert!(code.contains("pub user: models::User,"));
    assert!(code.contains("pub compact: Option<bool>,"));
    assert!(code.contains("pub display_name: serde_json::Value,"));

    assert_eq!(gen.generate_imports(&parsed.imports), "use crate::models;");
}

#[test]
fn test_schema_serializes_camel_case() {
    let parsed = parse_file("{{.Title}}", "Page").unwrap();
    let json = serde_json::to_value(&parsed.schemas[0]).unwrap();
    assert_eq!(json["fromTemplate"], "Page");
    assert_eq!(json["fields"][0]["jsonName"], "Title");
    assert_eq!(json["fields"][0]["type"], "any");
    assert_eq!(json["fields"][0]["source"], "usage");
}
