use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of diagnostics stored before the rest are only counted.
pub const MAX_ERRORS: usize = 20;

/// Which front-end stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// An `Illegal` token from the scanner reached a construct that needed
    /// a real token.
    Scan,
    /// Structural mismatch found by the parser.
    Parse,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => write!(f, "scan"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

/// A structured front-end error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiloError {
    /// Source file name.
    pub file: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl MiloError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        category: ErrorCategory,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            category,
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for MiloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} error: {}",
            self.file, self.span, self.category, self.message
        )
    }
}

impl std::error::Error for MiloError {}

/// Ordered list of diagnostics, as reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<MiloError>,
    pub total_errors: usize,
}

impl Diagnostics {
    /// Create an empty list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the [`MAX_ERRORS`] limit.
    pub fn push_error(&mut self, error: MiloError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Iterate over the stored errors in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, MiloError> {
        self.errors.iter()
    }
}
