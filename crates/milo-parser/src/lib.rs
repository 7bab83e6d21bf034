//! Milo parser: converts a token stream into an AST.
//!
//! The parser reads from any [`TokenSource`](milo_lexer::TokenSource), so it
//! can run directly on a [`Lexer`](milo_lexer::Lexer) or on a prepared
//! [`TokenBuffer`](milo_lexer::TokenBuffer).

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parse_expr::{Precedence, MAX_EXPR_DEPTH};
pub use parser::{ParseResult, Parser};
