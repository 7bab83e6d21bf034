//! Milo lexer: converts source text into a token stream.

pub mod lexer;

pub use lexer::{Lexer, TokenBuffer, TokenSource};
pub use milo_types::token::{Token, TokenKind, ALL_KEYWORDS};
