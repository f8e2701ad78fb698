use std::fmt;

/// Category of a problem found while loading a definition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Wrong token count or a malformed placeholder.
    MalformedDirective,
    /// A binary literal or bit pattern contains characters other than `0`/`1`.
    InvalidLiteral,
    /// A bit pattern key that the match pattern never declared (or the reverse).
    UnresolvedPlaceholder,
    /// A match pattern names an operand group that does not exist or has no operands.
    UnresolvedGroup,
    /// The assembled encoding does not fit the 64-bit transform.
    WidthOverflow,
    UnrecognizedDirective,
}

/// Severity of an ISA diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// A precise source position (1-indexed line/column) inside a definition source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Location of a diagnostic: the source label plus a point inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub source: String,
    pub start: SourcePosition,
}

impl SourceSpan {
    pub fn point(source: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            source: source.into(),
            start: position,
        }
    }
}

/// Structured diagnostic collected while a definition is loaded.
#[derive(Debug, Clone)]
pub struct IsaDiagnostic {
    pub level: DiagnosticLevel,
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl IsaDiagnostic {
    pub fn new(
        level: DiagnosticLevel,
        kind: DiagnosticKind,
        code: &'static str,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Self {
        Self {
            level,
            kind,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }

    pub fn line(&self) -> Option<usize> {
        self.span.as_ref().map(|span| span.start.line)
    }

    pub fn format_human(&self) -> String {
        let location = self
            .span
            .as_ref()
            .map(|span| format!("{}:{}:{}", span.source, span.start.line, span.start.column))
            .unwrap_or_else(|| "<unknown>".to_string());
        format!(
            "{level:?} {code}: {message} @ {location}",
            level = self.level,
            code = self.code,
            message = self.message,
            location = location
        )
    }
}

impl fmt::Display for IsaDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_human())
    }
}
