//! `@param` comment annotations.
//!
//! A template declares the type of one of its variables with a comment:
//!
//! ```text
//! {{- /* @param Title string */}}
//! {{- /* @param subtitle? string */}}
//! {{- /* @param Author models.User */}}
//! ```
//!
//! Before parsing, each such comment is rewritten into a call of the
//! [`PARAM_MARKER`] function so that the annotation survives as an ordinary
//! action in the syntax tree.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Function name used for rewritten annotations
pub const PARAM_MARKER: &str = "__param__";

fn annotation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"\{\{-?\s*/\*\s*@param\s+([A-Za-z0-9_/-]+\??)\s+([A-Za-z0-9_\[\]*./:]+).*?\*/\s*-?\}\}",
        )
        .expect("annotation pattern is valid")
    })
}

/// Rewrite every `@param` comment into `{{- __param__ "<name>" "<type>" -}}`
pub fn rewrite_param_comments(source: &str) -> Cow<'_, str> {
    let rewritten = annotation_pattern().replace_all(
        source,
        format!(r#"{{{{- {} "${{1}}" "${{2}}" -}}}}"#, PARAM_MARKER).as_str(),
    );
    if let Cow::Owned(_) = rewritten {
        tracing::debug!("rewrote @param annotations");
    }
    rewritten
}
