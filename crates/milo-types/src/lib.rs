//! Shared types for Milo.
//!
//! This crate defines the token model, the AST node types, source spans
//! and the front-end diagnostic types used by the lexer, parser,
//! evaluator and driver.

mod error;
mod span;
pub mod ast;
pub mod token;

pub use error::{Diagnostics, ErrorCategory, MiloError, MAX_ERRORS};
pub use span::{SourceFile, Span};
pub use token::{Token, TokenKind, ALL_KEYWORDS};
