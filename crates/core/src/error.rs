use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while parsing a fixer set from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixerParseError {
    /// A single-letter fixer code that is not one of `q`, `d`, `e`.
    #[error("Unknown fixer letter '{0}' (expected one of 'q', 'd', 'e')")]
    UnknownFixer(char),
    /// A fixer name that is not one of `quotes`, `dashes`, `ellipses`.
    #[error("Unknown fixer '{0}' (expected quotes, dashes or ellipses)")]
    UnknownName(String),
}
