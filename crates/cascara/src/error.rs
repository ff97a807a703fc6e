//! Error types for the compiler.

use std::path::PathBuf;

use crate::source::{Source, Span};

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A hard failure; the construct that produced it is unusable.
    Error,
    /// A recoverable issue; compilation continues with the construct
    /// left as written.
    Warning,
}

/// A message anchored to a location in a source file.
///
/// The source excerpt is rendered at construction time so the
/// diagnostic stays self-contained after the source is dropped:
///
/// ```text
/// styles/app.css:3:9
/// declaration must have a value:
///     width: ;
///            ~
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Whether this is an error or a warning.
    pub severity: Severity,
    /// Human-readable description of the problem.
    pub message: String,
    /// Path of the offending source file.
    pub path: PathBuf,
    /// 1-indexed line of the offending span.
    pub line: u32,
    /// 1-indexed column of the offending span.
    pub col: u32,
    /// Byte range of the offending text.
    pub span: Span,
    context: String,
}

impl Diagnostic {
    /// Create an error diagnostic for `span` in `source`.
    pub fn error(source: &Source, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, source, span, message.into())
    }

    /// Create a warning diagnostic for `span` in `source`.
    pub fn warning(source: &Source, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, source, span, message.into())
    }

    fn new(severity: Severity, source: &Source, span: Span, message: String) -> Self {
        let (line, col) = source.line_and_col(span);
        Self {
            severity,
            message,
            path: source.path().to_path_buf(),
            line,
            col,
            span,
            context: annotate_source_span(source, span),
        }
    }

    /// The rendered source excerpt with a `~~~` underline.
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}\n{}:\n{}",
            self.path.display(),
            self.line,
            self.col,
            self.message,
            self.context
        )
    }
}

/// Annotate a span within a single line of the source. Tabs are
/// expanded to two spaces; an underline that would run past the end of
/// the line is truncated and marked with `>`.
pub fn annotate_source_span(source: &Source, span: Span) -> String {
    let line_span = source.full_line(span);
    let line = source.slice(line_span);

    let col = span.start - line_span.start;
    let tab_count = line[..col].matches('\t').count();
    let without_tabs = line.replace('\t', "  ");

    let indent = " ".repeat(col + tab_count);
    let mut underline_len = span.len().max(1);
    let mut excess_marker = "";
    if span.start + underline_len > line_span.end {
        underline_len = line_span.end.saturating_sub(span.start).max(1);
        excess_marker = ">";
    }
    let underline = "~".repeat(underline_len);

    format!("\t{without_tabs}\n\t{indent}{underline}{excess_marker}")
}

/// Errors that can occur while compiling CSS.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed token: unterminated string or comment, unexpected EOF,
    /// invalid escape.
    #[error("{0}")]
    Lex(Diagnostic),

    /// Syntactic violation: unexpected token kind, unsupported at-rule,
    /// missing declaration value, missing selector.
    #[error("{0}")]
    Parse(Diagnostic),

    /// Semantically invalid construct found during transform, or a
    /// recoverable transform warning.
    #[error("{0}")]
    Transform(Diagnostic),

    /// An import specifier could not be resolved to a file.
    #[error("failed to resolve import \"{spec}\" from {}", from_dir.display())]
    Resolve {
        /// The import specifier as written.
        spec: String,
        /// The directory of the importing file.
        from_dir: PathBuf,
    },

    /// File read failure.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path to the file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The severity of this error; everything except transform warnings
    /// is [`Severity::Error`].
    pub fn severity(&self) -> Severity {
        match self.diagnostic() {
            Some(diag) => diag.severity,
            None => Severity::Error,
        }
    }

    /// The location-annotated diagnostic, for errors that carry one.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::Lex(diag) | Error::Parse(diag) | Error::Transform(diag) => Some(diag),
            Error::Resolve { .. } | Error::Io { .. } => None,
        }
    }
}
