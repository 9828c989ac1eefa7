//! Quoting helpers for template string constants.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid string literal {literal}: {reason}")]
pub struct UnquoteError {
    pub literal: String,
    pub reason: String,
}

impl UnquoteError {
    fn new(literal: &str, reason: impl Into<String>) -> Self {
        Self {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}

/// Decode a quoted (`"..."`) or raw (`` `...` ``) string constant
pub fn unquote(literal: &str) -> Result<String, UnquoteError> {
    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        return Ok(literal[1..literal.len() - 1].to_string());
    }

    if literal.len() < 2 || !literal.starts_with('"') || !literal.ends_with('"') {
        return Err(UnquoteError::new(literal, "not a quoted string"));
    }

    let inner = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return Err(UnquoteError::new(literal, "unescaped quote")),
            '\n' => return Err(UnquoteError::new(literal, "newline in string")),
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| UnquoteError::new(literal, "trailing backslash"))?;
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0C}'),
                    'v' => out.push('\u{0B}'),
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    '\'' => out.push('\''),
                    'x' => out.push(hex_escape(&mut chars, 2, literal)?),
                    'u' => out.push(hex_escape(&mut chars, 4, literal)?),
                    'U' => out.push(hex_escape(&mut chars, 8, literal)?),
                    other => {
                        return Err(UnquoteError::new(
                            literal,
                            format!("unknown escape sequence \\{}", other),
                        ))
                    }
                }
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn hex_escape(
    chars: &mut std::str::Chars<'_>,
    digits: usize,
    literal: &str,
) -> Result<char, UnquoteError> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return Err(UnquoteError::new(literal, "truncated hex escape"));
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| UnquoteError::new(literal, format!("invalid hex escape {}", hex)))
}

/// Quote a string so that `unquote` returns it unchanged
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_plain() {
        assert_eq!(unquote(r#""Name""#).unwrap(), "Name");
    }

    #[test]
    fn test_unquote_escapes() {
        assert_eq!(unquote(r#""a\"b\n\x41""#).unwrap(), "a\"b\nA");
    }

    #[test]
    fn test_unquote_raw() {
        assert_eq!(unquote("`a\\nb`").unwrap(), "a\\nb");
    }

    #[test]
    fn test_unquote_rejects_unknown_escape() {
        assert!(unquote(r#""\q""#).is_err());
        assert!(unquote("Name").is_err());
    }

    #[test]
    fn test_quote_inverts_unquote() {
        let value = "say \"hi\"\n";
        assert_eq!(unquote(&quote(value)).unwrap(), value);
    }
}
