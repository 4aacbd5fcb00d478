//! Semantic error codes and the buffered diagnostic sink

use crate::common::Span;
use std::fmt::Write as _;

/// Stable semantic error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UndeclaredIdentifier,
    RedeclaredIdentifier,
    InvalidOperator,
    InvalidType,
    TypeMismatch,
    TypeMustBeInteger,
    TypeMustBeString,
    TypeMustBeBoolean,
    TypeMustBeArray,
    IncompatibleAssignment,
    IncompatibleComparison,
    NameMustBeFunction,
    ArgumentCountMismatch,
    InvalidReturnType,
    IndexOutOfBounds,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        match self {
            Self::UndeclaredIdentifier => "Undeclared identifier",
            Self::RedeclaredIdentifier => "Redeclared identifier",
            Self::InvalidOperator => "Invalid operator",
            Self::InvalidType => "Invalid type",
            Self::TypeMismatch => "Mismatched datatype",
            Self::TypeMustBeInteger => "Datatype must be integer",
            Self::TypeMustBeString => "Datatype must be string",
            Self::TypeMustBeBoolean => "Datatype must be boolean",
            Self::TypeMustBeArray => "Datatype must be an array",
            Self::IncompatibleAssignment => "Incompatible assignment",
            Self::IncompatibleComparison => "Incompatible comparison",
            Self::NameMustBeFunction => "Must be a function name",
            Self::ArgumentCountMismatch => "Invalid number of arguments",
            Self::InvalidReturnType => "Invalid function return type",
            Self::IndexOutOfBounds => "Index out of bounds",
        }
    }
}

/// One buffered diagnostic: code, 1-based line, verbatim source text
#[derive(Debug, Clone)]
pub struct SemanticDiagnostic {
    pub code: ErrorCode,
    pub line: usize,
    pub text: String,
    pub span: Span,
}

/// Ordered collector for semantic diagnostics
///
/// Analysis never aborts on a semantic violation; every check site flags
/// here and continues with a placeholder result. Presentation is the
/// driver's concern.
#[derive(Debug, Default)]
pub struct SemanticErrorHandler {
    diagnostics: Vec<SemanticDiagnostic>,
}

impl SemanticErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag a semantic error
    pub fn flag(&mut self, code: ErrorCode, line: usize, text: impl Into<String>, span: Span) {
        self.diagnostics.push(SemanticDiagnostic {
            code,
            line,
            text: text.into(),
            span,
        });
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[SemanticDiagnostic] {
        &self.diagnostics
    }

    /// Render the classic fixed-column error table
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        if self.diagnostics.is_empty() {
            return out;
        }

        out.push_str("\n===== SEMANTIC ERRORS =====\n\n");
        let _ = writeln!(out, "{:<4} {:<40} {}", "Line", "Message", "Found near");
        let _ = writeln!(out, "{:<4} {:<40} {}", "----", "-------", "----------");
        for diagnostic in &self.diagnostics {
            let _ = writeln!(
                out,
                "{:03}  {:<40} \"{}\"",
                diagnostic.line,
                diagnostic.code.message(),
                diagnostic.text
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_keep_insertion_order() {
        let mut handler = SemanticErrorHandler::new();
        handler.flag(ErrorCode::UndeclaredIdentifier, 3, "x", Span::new(10, 11));
        handler.flag(ErrorCode::TypeMismatch, 1, "y", Span::new(2, 3));

        assert_eq!(handler.count(), 2);
        assert_eq!(handler.diagnostics()[0].code, ErrorCode::UndeclaredIdentifier);
        assert_eq!(handler.diagnostics()[1].line, 1);
    }

    #[test]
    fn test_render_table_lists_each_error() {
        let mut handler = SemanticErrorHandler::new();
        handler.flag(ErrorCode::RedeclaredIdentifier, 7, "n", Span::new(0, 1));

        let table = handler.render_table();
        assert!(table.contains("SEMANTIC ERRORS"));
        assert!(table.contains("007"));
        assert!(table.contains("Redeclared identifier"));
    }

    #[test]
    fn test_empty_sink_renders_nothing() {
        assert_eq!(SemanticErrorHandler::new().render_table(), "");
    }
}
