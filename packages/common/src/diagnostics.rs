//! Diagnostic reporting for compile passes.
//!
//! Library code never writes to a process-wide logger for user-facing
//! warnings. Every compile entry point takes a `&mut dyn DiagnosticSink`
//! and reports recoverable problems (formatting fallbacks, missing
//! component props) through it. The caller decides what to do with them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// File or template the diagnostic refers to, if known
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            source: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {} ({})", self.severity, self.message, source),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Receiver for diagnostics produced during a compile pass
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn warn(&mut self, message: String) {
        self.report(Diagnostic::warning(message));
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let source = diagnostic.source.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Info => tracing::info!(source, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(source, "{}", diagnostic.message),
        }
    }
}

/// Keeps every diagnostic in memory, in report order
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::info("first"));
        sink.warn("second".to_string());

        assert_eq!(sink.diagnostics.len(), 2);
        assert_eq!(sink.diagnostics[0].message, "first");
        assert_eq!(sink.warnings().count(), 1);
    }

    #[test]
    fn test_display_includes_source() {
        let d = Diagnostic::warning("missing prop").with_source("Card.html");
        assert_eq!(d.to_string(), "warning: missing prop (Card.html)");
    }
}
