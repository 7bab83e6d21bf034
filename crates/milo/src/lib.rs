//! Milo driver: orchestrates the full pipeline.
//!
//! ```text
//! Milo Source → Lexer → Parser → Evaluator → output lines + RunReport
//! ```
//!
//! The binary in `main.rs` is a thin clap front end over these functions.

use milo_eval::{Evaluator, Object, StatementError};
use milo_lexer::{Lexer, Token, TokenKind};
use milo_types::{Diagnostics, MiloError, SourceFile, Span};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

pub use milo_parser::ParseResult;

// ══════════════════════════════════════════════════════════════════════════════
// Options & Errors
// ══════════════════════════════════════════════════════════════════════════════

/// Knobs for [`run_source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Evaluate the statements that parsed even when parsing failed.
    pub evaluate_on_parse_error: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            evaluate_on_parse_error: true,
        }
    }
}

/// Failure to get a script into the pipeline at all.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ══════════════════════════════════════════════════════════════════════════════
// Report
// ══════════════════════════════════════════════════════════════════════════════

/// Everything a run produced, serializable to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub file: String,
    /// `true` if there were no parse or runtime errors.
    pub success: bool,
    /// Whether the evaluator ran.
    pub evaluated: bool,
    pub parse_errors: Diagnostics,
    pub output: Vec<String>,
    pub runtime_errors: Vec<RuntimeErrorReport>,
    /// Final environment, ordered by name.
    pub bindings: BTreeMap<String, BindingReport>,
}

/// A runtime error as it appears in a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeErrorReport {
    /// Index of the failing top-level statement.
    pub statement: usize,
    #[serde(flatten)]
    pub span: Span,
    pub message: String,
}

/// A binding's type tag and rendered value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingReport {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl From<&StatementError> for RuntimeErrorReport {
    fn from(err: &StatementError) -> Self {
        Self {
            statement: err.index,
            span: err.span,
            message: err.error.to_string(),
        }
    }
}

impl From<&Object> for BindingReport {
    fn from(value: &Object) -> Self {
        Self {
            kind: value.object_type().to_string(),
            value: value.to_string(),
        }
    }
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.success
    }

    /// Human-readable diagnostics: parse errors, then runtime errors.
    pub fn diagnostics(&self) -> Vec<String> {
        let parse = self.parse_errors.iter().map(render_parse_error);
        let runtime = self.runtime_errors.iter().map(|err| {
            format!("{}:{}: runtime error: {}", self.file, err.span, err.message)
        });
        parse.chain(runtime).collect()
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

/// Lex and parse `source`, reporting errors against `name`.
pub fn parse_source(name: &str, source: &str) -> ParseResult {
    let sf = SourceFile::new(name, source);
    milo_parser::Parser::new(Lexer::new(&sf), &sf).parse()
}

/// Scan `source` into its tokens, excluding the final `Eof`.
pub fn tokenize_source(source: &str) -> Vec<Token> {
    let mut tokens = Lexer::from_text(source).tokenize();
    tokens.retain(|t| t.kind != TokenKind::Eof);
    tokens
}

/// One line per token in the form `Type: KIND | Literal: text`.
pub fn format_token(token: &Token) -> String {
    format!("Type: {} | Literal: {}", token.kind.as_str(), token.literal)
}

/// Parse and evaluate `source`.
///
/// Statements that parsed before a parse failure are still evaluated
/// unless `options.evaluate_on_parse_error` is off.
pub fn run_source(name: &str, source: &str, options: &RunOptions) -> RunReport {
    let parsed = parse_source(name, source);
    let parse_failed = parsed.errors.has_errors();
    debug!(
        file = name,
        statements = parsed.program.len(),
        parse_errors = parsed.errors.total_errors,
        "parsed"
    );

    let mut report = RunReport {
        file: name.to_string(),
        success: !parse_failed,
        evaluated: false,
        parse_errors: parsed.errors,
        output: Vec::new(),
        runtime_errors: Vec::new(),
        bindings: BTreeMap::new(),
    };

    if parse_failed && !options.evaluate_on_parse_error {
        info!(file = name, "parse failed, skipping evaluation");
        return report;
    }

    let mut evaluator = Evaluator::new(&parsed.program);
    evaluator.evaluate();
    let (output, env, errors) = evaluator.into_parts();

    report.evaluated = true;
    report.success &= errors.is_empty();
    report.output = output;
    report.runtime_errors = errors.iter().map(RuntimeErrorReport::from).collect();
    report.bindings = env
        .iter()
        .map(|(name, value)| (name.to_string(), BindingReport::from(value)))
        .collect();
    report
}

/// Render a parse diagnostic with its source line and any suggestion.
pub fn render_parse_error(err: &MiloError) -> String {
    let mut text = err.to_string();
    if !err.source_line.is_empty() {
        text.push_str("\n    ");
        text.push_str(&err.source_line);
    }
    if let Some(suggestion) = &err.suggestion {
        text.push_str("\n    help: ");
        text.push_str(suggestion);
    }
    text
}

/// Read a script from disk.
pub fn read_source(path: &Path) -> Result<String, DriverError> {
    std::fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Read a script from disk and run it.
pub fn run_file(path: &Path, options: &RunOptions) -> Result<RunReport, DriverError> {
    let source = read_source(path)?;
    Ok(run_source(&path.display().to_string(), &source, options))
}
