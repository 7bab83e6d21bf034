//! Milo lexer: converts source text into tokens on demand.
//!
//! - Whitespace (including newlines) separates tokens and is skipped
//! - `//` comments run to end of line
//! - Unrecognised characters and unterminated strings become
//!   [`TokenKind::Illegal`] tokens; the parser decides what they break
//! - After the input is exhausted every call yields [`TokenKind::Eof`]

use milo_types::{SourceFile, Span, Token, TokenKind};

/// A producer of tokens, consumed one at a time by the parser.
///
/// Implementations must keep returning an `Eof` token once the input is
/// exhausted.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// The Milo lexer.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self::from_text(&source_file.source)
    }

    /// Create a lexer over a bare string.
    pub fn from_text(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Scan the whole input. The result always ends with exactly one `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn text_from(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and `//` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while self.peek().is_some_and(|ch| ch != b'\n') {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Token::eof(Span::point(self.line, self.col));
        };

        let kind = match ch {
            b'"' => return self.scan_string(start, start_line, start_col),
            b'0'..=b'9' => return self.scan_number(start, start_line, start_col),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                return self.scan_identifier(start, start_line, start_col)
            }

            b'=' => self.one_or_two(b'=', TokenKind::Assign, TokenKind::Equals),
            b'!' => self.one_or_two(b'=', TokenKind::Bang, TokenKind::NotEquals),
            b'+' => self.one_or_two(b'+', TokenKind::Plus, TokenKind::Increment),
            b'-' => self.one_or_two(b'-', TokenKind::Minus, TokenKind::Decrement),
            b'*' => TokenKind::Asterisk,
            b'/' => TokenKind::Slash,
            b'<' => TokenKind::LessThan,
            b'>' => TokenKind::GreaterThan,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,

            _ => {
                // Consume the rest of a multi-byte character so the literal
                // stays valid UTF-8.
                while self.peek().is_some_and(|b| b & 0xC0 == 0x80) {
                    self.advance();
                }
                TokenKind::Illegal
            }
        };

        Token::new(kind, self.text_from(start), self.span_from(start_line, start_col))
    }

    /// Pick the two-character kind if the next byte is `second`.
    fn one_or_two(&mut self, second: u8, single: TokenKind, double: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn scan_number(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.advance(); // consume '.'
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }
        Token::new(
            TokenKind::Number,
            self.text_from(start),
            self.span_from(start_line, start_col),
        )
    }

    fn scan_identifier(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == b'_')
        {
            self.advance();
        }
        let text = self.text_from(start);
        let kind = TokenKind::from_keyword(&text).unwrap_or(TokenKind::Ident);
        Token::new(kind, text, self.span_from(start_line, start_col))
    }

    /// Scan a string literal after the opening `"`. The literal is the
    /// unescaped content; an unterminated string becomes `Illegal` with
    /// the raw text.
    fn scan_string(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        let mut buf = Vec::new();
        loop {
            match self.advance() {
                None => {
                    return Token::new(
                        TokenKind::Illegal,
                        self.text_from(start),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'"') => {
                    return Token::new(
                        TokenKind::String,
                        String::from_utf8_lossy(&buf).into_owned(),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'\\') => match self.advance() {
                    Some(b'n') => buf.push(b'\n'),
                    Some(b't') => buf.push(b'\t'),
                    Some(b'r') => buf.push(b'\r'),
                    // `\"`, `\\` and unknown escapes keep the escaped byte
                    Some(other) => buf.push(other),
                    None => {
                        return Token::new(
                            TokenKind::Illegal,
                            self.text_from(start),
                            self.span_from(start_line, start_col),
                        );
                    }
                },
                Some(other) => buf.push(other),
            }
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        self.scan_token()
    }
}

/// Adapts a prepared token vector to [`TokenSource`].
///
/// Yields `Eof` (at the span of the last token) once the vector is spent,
/// whether or not it ended with one.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    tokens: std::vec::IntoIter<Token>,
    last_span: Span,
}

impl TokenBuffer {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            last_span: Span::point(1, 1),
        }
    }
}

impl From<Vec<Token>> for TokenBuffer {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.last_span = token.span;
                token
            }
            None => Token::eof(self.last_span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_repeats_after_end() {
        let mut lexer = Lexer::from_text("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_token_buffer_appends_eof() {
        let mut buffer = TokenBuffer::new(vec![Token::new(
            TokenKind::Number,
            "5",
            Span::new(2, 1, 2, 1),
        )]);
        assert_eq!(buffer.next_token().literal, "5");
        let eof = buffer.next_token();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.span, Span::new(2, 1, 2, 1));
        assert_eq!(buffer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::from_text("let a\n  = 10;").tokenize();
        assert_eq!(tokens[0].span, Span::new(1, 1, 1, 3));
        assert_eq!(tokens[2].span, Span::new(2, 3, 2, 3));
        assert_eq!(tokens[3].span, Span::new(2, 5, 2, 6));
    }
}
