/// Serializer output must parse back to the same canonical text
use crate::*;

fn canonical(source: &str) -> String {
    let set = parse(source).unwrap_or_else(|e| panic!("Failed to parse {}: {}", source, e));
    serialize(&set.root)
}

#[test]
fn test_serializer_is_stable() {
    let sources = vec![
        "<p>{{ .User.Name }}</p>",
        "{{if .A}}a{{else if .B}}b{{else}}c{{end}}",
        "{{with $x := .Item}}{{$x.Name}}{{else with .Fallback}}{{.}}{{end}}",
        "{{range $i, $e := .Items}}{{if eq $i 0}}{{continue}}{{end}}{{$e}}{{end}}",
        r#"{{template "row" (index .Rows 0).Cells}}"#,
        r#"{{printf "%d items" (len .Items) | html}}"#,
        "{{ $n = 3 }}{{ nil }}{{ true }}{{ 'x' }}",
    ];

    for source in sources {
        let once = canonical(source);
        let twice = canonical(&once);
        assert_eq!(once, twice, "serializer not stable for {}", source);
    }
}

#[test]
fn test_serialize_definition_body() {
    let set = parse(r#"{{define "input"}}<input type="{{.Type}}"/>{{end}}"#).unwrap();
    let body = &set.first_definition().unwrap().body;
    assert_eq!(serialize(body), r#"<input type="{{.Type}}"/>"#);
}

#[test]
fn test_serialize_else_if_as_nested_if() {
    assert_eq!(
        canonical("{{if .A}}a{{else if .B}}b{{end}}"),
        "{{if .A}}a{{else}}{{if .B}}b{{end}}{{end}}"
    );
}

#[test]
fn test_serialize_keeps_text_whitespace() {
    assert_eq!(canonical("  <li>\n    {{.X}}\n  </li>\n"), "  <li>\n    {{.X}}\n  </li>\n");
}

#[test]
fn test_serialize_applies_trim_markers() {
    assert_eq!(canonical("<ul>\n  {{- .X -}}\n</ul>"), "<ul>{{.X}}</ul>");
}
