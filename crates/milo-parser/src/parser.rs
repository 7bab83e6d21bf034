//! Core parser infrastructure: two-token lookahead, error reporting, helpers.

use milo_lexer::TokenSource;
use milo_types::ast::Program;
use milo_types::{Diagnostics, ErrorCategory, MiloError, SourceFile, Span, Token, TokenKind};
use tracing::{debug, trace};

/// The Milo parser.
///
/// Pulls tokens from a [`TokenSource`] keeping two tokens of lookahead
/// (`cur` and `peek`) and builds a [`Program`]. Parsing stops at the
/// first statement that cannot be built; no resynchronization is
/// attempted, so the program holds every statement before the failure.
pub struct Parser<'src, S: TokenSource> {
    /// Where tokens come from.
    tokens: S,
    /// The token under examination.
    pub(crate) cur: Token,
    /// The token after `cur`.
    pub(crate) peek: Token,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Collected errors.
    errors: Diagnostics,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
}

/// Result of parsing.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Statements parsed before the first failure (all of them on success).
    pub program: Program,
    pub errors: Diagnostics,
}

impl ParseResult {
    /// `true` if the whole input was parsed without errors.
    pub fn is_ok(&self) -> bool {
        !self.errors.has_errors()
    }
}

impl<'src, S: TokenSource> Parser<'src, S> {
    /// Create a parser and prime the two lookahead tokens.
    pub fn new(mut tokens: S, source_file: &'src SourceFile) -> Self {
        let cur = tokens.next_token();
        let peek = tokens.next_token();
        Self {
            tokens,
            cur,
            peek,
            source_file,
            errors: Diagnostics::empty(),
            expr_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Shift the lookahead window by one token.
    pub(crate) fn next(&mut self) {
        let incoming = self.tokens.next_token();
        self.cur = std::mem::replace(&mut self.peek, incoming);
    }

    pub(crate) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Advance if the next token is `kind`; otherwise report the mismatch.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_is(kind) {
            self.next();
            Some(())
        } else {
            self.peek_error(&describe(kind));
            None
        }
    }

    /// Report that the next token is not what the grammar expected.
    pub(crate) fn peek_error(&mut self, expected: &str) {
        let found = self.peek.clone();
        self.mismatch(expected, &found);
    }

    /// Report that the current token is not what the grammar expected.
    pub(crate) fn cur_error(&mut self, expected: &str) {
        let found = self.cur.clone();
        self.mismatch(expected, &found);
    }

    fn mismatch(&mut self, expected: &str, found: &Token) {
        let category = if found.kind == TokenKind::Illegal {
            ErrorCategory::Scan
        } else {
            ErrorCategory::Parse
        };
        self.error_at(
            category,
            format!("expected {expected}, found {found}"),
            found.span,
        );
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at a specific span.
    pub(crate) fn error_at(
        &mut self,
        category: ErrorCategory,
        message: impl Into<String>,
        span: Span,
    ) {
        let error = self.make_error(category, message, span);
        self.errors.push_error(error);
    }

    /// Report an error with a fix suggestion attached.
    pub(crate) fn error_with_suggestion(
        &mut self,
        category: ErrorCategory,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let error = self
            .make_error(category, message, span)
            .with_suggestion(suggestion);
        self.errors.push_error(error);
    }

    fn make_error(
        &self,
        category: ErrorCategory,
        message: impl Into<String>,
        span: Span,
    ) -> MiloError {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        MiloError::new(&self.source_file.name, category, message, span, source_line)
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Program`.
    pub fn parse(mut self) -> ParseResult {
        let mut program = Program::default();
        while !self.cur_is(TokenKind::Eof) {
            trace!(token = %self.cur, "parsing statement");
            match self.parse_statement() {
                Some(stmt) => program.statements.push(stmt),
                None => {
                    debug!(
                        parsed = program.statements.len(),
                        at = %self.cur.span,
                        "statement failed, parsing halted"
                    );
                    break;
                }
            }
        }
        ParseResult {
            program,
            errors: self.errors,
        }
    }
}

/// How a token kind is named in "expected ..." messages.
pub(crate) fn describe(kind: TokenKind) -> String {
    match kind {
        TokenKind::Ident | TokenKind::Number | TokenKind::String | TokenKind::Eof => {
            kind.as_str().to_string()
        }
        _ => format!("'{kind}'"),
    }
}
