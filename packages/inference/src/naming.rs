//! Identifier normalization.

fn capitalize_after(raw: &str, separators: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut upper_next = true;

    for c in raw.chars() {
        if separators.contains(&c) {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// `show-message?` -> `ShowMessage`
pub fn to_field_name(raw: &str) -> String {
    let raw = raw.strip_suffix('?').unwrap_or(raw);
    capitalize_after(raw, &['/', '-', '_'])
}

/// `ui/text-input` -> `UiTextInput`
pub fn to_struct_name(raw: &str) -> String {
    capitalize_after(raw, &['/', '-', '.'])
}

/// `ShowMessage` -> `show_message`, `UserID` -> `user_id`
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map_or(false, char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    let out = out.trim_end_matches('_').to_string();
    match out.chars().next() {
        None => "field".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", out),
        _ => out,
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

/// Snake-case identifier that is valid as a Rust field name
pub fn to_rust_ident(name: &str) -> String {
    let ident = to_snake_case(name);
    match ident.as_str() {
        "self" | "super" | "crate" | "Self" => format!("{}_", ident),
        kw if RUST_KEYWORDS.contains(&kw) => format!("r#{}", kw),
        _ => ident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_field_name() {
        assert_eq!(to_field_name("name"), "Name");
        assert_eq!(to_field_name("show-message"), "ShowMessage");
        assert_eq!(to_field_name("user_id?"), "UserId");
        assert_eq!(to_field_name("ui/card"), "UiCard");
        assert_eq!(to_field_name("text-input"), "TextInput");
    }

    #[test]
    fn test_to_struct_name() {
        assert_eq!(to_struct_name("ui/text-input"), "UiTextInput");
        assert_eq!(to_struct_name("page.home"), "PageHome");
        assert_eq!(to_struct_name("YourStdoutStruct"), "YourStdoutStruct");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("ShowMessage"), "show_message");
        assert_eq!(to_snake_case("UserID"), "user_id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("ui-text-input"), "ui_text_input");
        assert_eq!(to_snake_case("404"), "_404");
    }

    #[test]
    fn test_to_rust_ident() {
        assert_eq!(to_rust_ident("Type"), "r#type");
        assert_eq!(to_rust_ident("Self"), "self_");
        assert_eq!(to_rust_ident("ItemCount"), "item_count");
    }
}
