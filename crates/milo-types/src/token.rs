//! Token types shared by the lexer, the parser and the AST.
//!
//! A [`Token`] pairs a closed [`TokenKind`] with the literal text it was
//! scanned from. AST nodes keep their leading token, so the type lives
//! here rather than in the lexer crate.

use crate::Span;
use std::fmt;

/// All reserved words in Milo.
pub const ALL_KEYWORDS: &[&str] = &["let", "return", "fn", "if", "else", "true", "false"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The text this token stands for. For strings this is the unescaped
    /// content; for `Eof` it is empty.
    pub literal: String,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    /// Create a token with no source location, e.g. for hand-built streams.
    pub fn synthetic(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self::new(kind, literal, Span::default())
    }

    /// The end-of-input sentinel.
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Illegal => write!(f, "ILLEGAL '{}'", self.literal),
            TokenKind::Ident | TokenKind::Number => write!(f, "{} '{}'", self.kind, self.literal),
            TokenKind::String => write!(f, "STRING \"{}\"", self.literal),
            _ => write!(f, "'{}'", self.literal),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the Milo language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ── Sentinels ────────────────────────────────────────────

    /// A character (or unterminated string) the scanner did not recognise.
    Illegal,
    /// End of input.
    Eof,

    // ── Literals ─────────────────────────────────────────────

    /// User-defined identifier: `a`, `print`
    Ident,
    /// Numeric literal: `42`, `3.14`
    Number,
    /// String literal: `"hello"`
    String,

    // ── Keywords ─────────────────────────────────────────────

    /// `let`
    Let,
    /// `return`
    Return,
    /// `fn`
    Function,
    /// `if`
    If,
    /// `else`
    Else,
    /// `true`
    True,
    /// `false`
    False,

    // ── Operators ────────────────────────────────────────────

    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `!`
    Bang,
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,

    // ── Punctuation ──────────────────────────────────────────

    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
}

impl TokenKind {
    /// Look up a reserved word. Returns `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "let" => TokenKind::Let,
            "return" => TokenKind::Return,
            "fn" => TokenKind::Function,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        })
    }

    /// Returns `true` for reserved words.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Return
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// The name used for this kind in diagnostics and token dumps.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Let => "let",
            TokenKind::Return => "return",
            TokenKind::Function => "fn",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Equals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
