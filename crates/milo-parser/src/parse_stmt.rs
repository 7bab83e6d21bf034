//! Statement parsing.
//!
//! Statement parsers start with `cur` on the statement's first token and
//! leave `cur` on the first token after it.

use crate::parse_expr::Precedence;
use crate::parser::Parser;
use milo_lexer::TokenSource;
use milo_types::ast::*;
use milo_types::{ErrorCategory, TokenKind};

impl<S: TokenSource> Parser<'_, S> {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement().map(Stmt::Let),
            TokenKind::Return => self.parse_return_statement().map(Stmt::Return),
            _ => self.parse_expression_statement().map(Stmt::Expr),
        }
    }

    /// `let name = expr;`
    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::Ident)?;
        let name = Ident::from_token(self.cur.clone());
        self.expect_peek(TokenKind::Assign)?;
        self.next();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Semicolon)?;
        self.next();
        Some(LetStatement { token, name, value })
    }

    /// `return expr;`
    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let token = self.cur.clone();
        self.next(); // eat `return`
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Semicolon)?;
        self.next();
        Some(ReturnStatement { token, value })
    }

    /// `expr [;]`
    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let token = self.cur.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.next();
        if self.cur_is(TokenKind::Semicolon) {
            self.next();
        }
        Some(ExpressionStatement { token, expr })
    }

    /// Parse `{ stmts... }` with `cur` on the `{`. Leaves `cur` on the `}`.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let token = self.cur.clone();
        self.next(); // eat `{`
        let mut statements = Vec::new();
        while !self.cur_is(TokenKind::RBrace) {
            if self.cur_is(TokenKind::Eof) {
                self.error_with_suggestion(
                    ErrorCategory::Parse,
                    "expected '}' to close block, found EOF",
                    self.cur.span,
                    format!("add '}}' to close the block opened at {}", token.span),
                );
                return None;
            }
            statements.push(self.parse_statement()?);
        }
        Some(Block { token, statements })
    }
}
