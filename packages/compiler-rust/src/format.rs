use crate::error::FormatFailure;
use htmlc_common::{Diagnostic, DiagnosticSink};
use tracing::warn;

/// Validate generated source and normalize its ending
pub fn format_source(source: &str) -> Result<String, FormatFailure> {
    syn::parse_file(source).map_err(|e| FormatFailure {
        message: e.to_string(),
    })?;

    let mut formatted = source.trim_end().to_string();
    formatted.push('\n');
    Ok(formatted)
}

/// Formatted source, or the raw source with a warning when it does not parse
pub fn format_or_raw(source: String, name: &str, sink: &mut dyn DiagnosticSink) -> String {
    match format_source(&source) {
        Ok(formatted) => formatted,
        Err(failure) => {
            warn!(file = name, error = %failure, "emitting unformatted source");
            sink.report(Diagnostic::warning(failure.to_string()).with_source(name));
            source
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use htmlc_common::CollectingSink;

    #[test]
    fn test_valid_source() {
        assert_eq!(
            format_source("pub struct A {}\n\n\n").unwrap(),
            "pub struct A {}\n"
        );
    }

    #[test]
    fn test_invalid_source_falls_back() {
        let mut sink = CollectingSink::new();
        let raw = "pub struct {".to_string();
        assert_eq!(format_or_raw(raw.clone(), "broken.rs", &mut sink), raw);

        let warnings: Vec<_> = sink.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source.as_deref(), Some("broken.rs"));
    }
}
