//! Internal diagnostic model for compiler-phase errors, and the bridge to
//! rendered [`miette::Report`]s.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagSeverity {
    /// A fatal error that prevents compilation from producing a predicate.
    Error,
    /// An informational note or advice, never fatal on its own.
    Note,
}

impl fmt::Display for DiagSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagSeverity::Error => write!(f, "error"),
            DiagSeverity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    pub span: Span,
    pub message: String,
}

impl DiagLabel {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A structured diagnostic message, the internal representation used
/// throughout the lexer, parser, and predicate compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub severity: DiagSeverity,
    pub message: String,
    pub labels: Vec<DiagLabel>,
    pub help: Option<String>,
    pub code: Option<String>,
}

impl Diag {
    pub fn new(severity: DiagSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Error, message)
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::new(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Renders this diagnostic as a [`miette::Report`] carrying `source` (the
    /// original filter string) as attached source code.
    pub fn into_report(self, source: &str) -> Report {
        let len = source.len();
        let labels = self
            .labels
            .into_iter()
            .map(|label| {
                let start = label.span.start.min(len);
                let end = label.span.end.min(len).max(start);
                LabeledSpan::new_primary_with_span(Some(label.message), (start, end - start))
            })
            .collect::<Vec<_>>();

        let built = BuiltDiagnostic {
            message: self.message,
            severity: match self.severity {
                DiagSeverity::Error => Severity::Error,
                DiagSeverity::Note => Severity::Advice,
            },
            code: self.code,
            help: self.help,
            labels,
        };

        Report::new(built).with_source_code(source.to_string())
    }
}

#[derive(Debug)]
struct BuiltDiagnostic {
    message: String,
    severity: Severity,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
}

impl fmt::Display for BuiltDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuiltDiagnostic {}

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }
}

/// The three error kinds the compiler can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridifyErrorKind {
    ParseError,
    UnknownField,
    UnsupportedOperator,
}

/// A compiler-phase error: a [`GridifyErrorKind`] plus the underlying
/// diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridifyError {
    pub kind: GridifyErrorKind,
    pub diag: Diag,
}

impl GridifyError {
    pub fn parse(diag: Diag) -> Self {
        Self {
            kind: GridifyErrorKind::ParseError,
            diag,
        }
    }

    pub fn unknown_field(field: &str, span: Span) -> Self {
        Self {
            kind: GridifyErrorKind::UnknownField,
            diag: Diag::error(format!("unknown field `{field}`"))
                .with_label(span, "not present in the active field mapper")
                .with_code("gridify::unknown_field"),
        }
    }

    pub fn unsupported_operator(op: crate::ast::CmpOp, field: &str, span: Span) -> Self {
        Self {
            kind: GridifyErrorKind::UnsupportedOperator,
            diag: Diag::error(format!(
                "operator `{}` is not supported on field `{field}`",
                op.as_str()
            ))
            .with_label(span, "this operator")
            .with_code("gridify::unsupported_operator"),
        }
    }

    /// Renders this error as a [`miette::Report`] with `source` attached.
    pub fn into_report(self, source: &str) -> Report {
        self.diag.into_report(source)
    }
}

impl fmt::Display for GridifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message)
    }
}

impl std::error::Error for GridifyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diag_builder_chain() {
        let diag = Diag::error("bad token")
            .with_label(0..3, "here")
            .with_help("check the operator spelling")
            .with_code("gridify::parse_error");

        assert_eq!(diag.message, "bad token");
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.help.as_deref(), Some("check the operator spelling"));
        assert_eq!(diag.code.as_deref(), Some("gridify::parse_error"));
    }

    #[test]
    fn unknown_field_error_renders() {
        let err = GridifyError::unknown_field("bogus", 0..5);
        assert_eq!(err.kind, GridifyErrorKind::UnknownField);
        let report = err.into_report("bogus==1");
        assert_eq!(report.to_string(), "unknown field `bogus`");
    }

    #[test]
    fn out_of_bounds_label_is_clamped_not_panicking() {
        let diag = Diag::error("oops").with_label(0..100, "too far");
        let report = diag.into_report("short");
        assert_eq!(report.to_string(), "oops");
    }
}
