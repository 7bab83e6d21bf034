//! Expression parsing via Pratt (top-down operator precedence).
//!
//! Precedence (lowest to highest):
//! 1. `==` `!=`
//! 2. `<` `>`
//! 3. `+` `-`
//! 4. `*` `/`
//! 5. Prefix: `!` `-` `++` `--`
//! 6. Call: `f(args)`
//!
//! All binary operators are left-associative.

use crate::parser::Parser;
use milo_lexer::TokenSource;
use milo_types::ast::*;
use milo_types::{ErrorCategory, TokenKind};

/// Maximum expression nesting depth before the parser gives up.
pub const MAX_EXPR_DEPTH: u32 = 64;

/// Binding power of an operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equality,
    Comparison,
    Sum,
    Product,
    Prefix,
    Call,
}

/// What a token does when it starts an expression.
#[derive(Debug, Clone, Copy)]
enum PrefixRule {
    Ident,
    Number,
    String,
    Boolean(bool),
    Operator(PrefixOp),
    Grouped,
    If,
    Function,
}

/// What a token does when it follows a complete left operand.
#[derive(Debug, Clone, Copy)]
enum InfixRule {
    Binary(BinOp),
    Call,
}

fn prefix_rule(kind: TokenKind) -> Option<PrefixRule> {
    let rule = match kind {
        TokenKind::Ident => PrefixRule::Ident,
        TokenKind::Number => PrefixRule::Number,
        TokenKind::String => PrefixRule::String,
        TokenKind::True => PrefixRule::Boolean(true),
        TokenKind::False => PrefixRule::Boolean(false),
        TokenKind::Bang => PrefixRule::Operator(PrefixOp::Not),
        TokenKind::Minus => PrefixRule::Operator(PrefixOp::Neg),
        TokenKind::Increment => PrefixRule::Operator(PrefixOp::Increment),
        TokenKind::Decrement => PrefixRule::Operator(PrefixOp::Decrement),
        TokenKind::LParen => PrefixRule::Grouped,
        TokenKind::If => PrefixRule::If,
        TokenKind::Function => PrefixRule::Function,
        _ => return None,
    };
    Some(rule)
}

fn infix_rule(kind: TokenKind) -> Option<(Precedence, InfixRule)> {
    let rule = match kind {
        TokenKind::Equals => (Precedence::Equality, InfixRule::Binary(BinOp::Eq)),
        TokenKind::NotEquals => (Precedence::Equality, InfixRule::Binary(BinOp::NotEq)),
        TokenKind::LessThan => (Precedence::Comparison, InfixRule::Binary(BinOp::Less)),
        TokenKind::GreaterThan => (Precedence::Comparison, InfixRule::Binary(BinOp::Greater)),
        TokenKind::Plus => (Precedence::Sum, InfixRule::Binary(BinOp::Add)),
        TokenKind::Minus => (Precedence::Sum, InfixRule::Binary(BinOp::Sub)),
        TokenKind::Asterisk => (Precedence::Product, InfixRule::Binary(BinOp::Mul)),
        TokenKind::Slash => (Precedence::Product, InfixRule::Binary(BinOp::Div)),
        TokenKind::LParen => (Precedence::Call, InfixRule::Call),
        _ => return None,
    };
    Some(rule)
}

impl Precedence {
    /// Binding power of `kind` in infix position; `Lowest` for tokens
    /// that cannot continue an expression.
    pub fn of(kind: TokenKind) -> Precedence {
        infix_rule(kind).map_or(Precedence::Lowest, |(prec, _)| prec)
    }
}

impl<S: TokenSource> Parser<'_, S> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression whose operators all bind tighter than
    /// `precedence`. Starts with `cur` on the first token of the
    /// expression and leaves `cur` on its last token.
    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at(
                ErrorCategory::Parse,
                format!("expression nesting exceeds maximum depth of {MAX_EXPR_DEPTH}"),
                self.cur.span,
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_expression_inner(precedence);
        self.expr_depth -= 1;
        result
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while let Some((next_prec, rule)) = infix_rule(self.peek.kind) {
            if next_prec <= precedence {
                break;
            }
            self.next();
            left = match rule {
                InfixRule::Binary(op) => self.parse_binary(left, op, next_prec)?,
                InfixRule::Call => self.parse_call(left)?,
            };
        }

        Some(left)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Prefix Position
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_prefix(&mut self) -> Option<Expr> {
        let Some(rule) = prefix_rule(self.cur.kind) else {
            self.no_prefix_rule();
            return None;
        };
        let token = self.cur.clone();

        match rule {
            PrefixRule::Ident => {
                let name = token.literal.clone();
                Some(Expr::new(ExprKind::Ident(name), token))
            }
            PrefixRule::Number => match token.literal.parse::<f64>() {
                Ok(value) => Some(Expr::new(ExprKind::Number(value), token)),
                Err(_) => {
                    self.error_at(
                        ErrorCategory::Parse,
                        format!("could not parse '{}' as a number", token.literal),
                        token.span,
                    );
                    None
                }
            },
            PrefixRule::String => {
                let value = token.literal.clone();
                Some(Expr::new(ExprKind::String(value), token))
            }
            PrefixRule::Boolean(value) => Some(Expr::new(ExprKind::Boolean(value), token)),
            PrefixRule::Operator(op) => self.parse_prefix_operator(op),
            PrefixRule::Grouped => self.parse_grouped(),
            PrefixRule::If => self.parse_if(),
            PrefixRule::Function => self.parse_function(),
        }
    }

    fn no_prefix_rule(&mut self) {
        if self.cur_is(TokenKind::Illegal) {
            let message = format!("illegal token '{}'", self.cur.literal);
            self.error_at(ErrorCategory::Scan, message, self.cur.span);
        } else {
            self.cur_error("expression");
        }
    }

    /// `!x`, `-x`, `++x`, `--x`
    fn parse_prefix_operator(&mut self, op: PrefixOp) -> Option<Expr> {
        let token = self.cur.clone();
        self.next();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::new(
            ExprKind::Prefix {
                op,
                right: Box::new(right),
            },
            token,
        ))
    }

    /// `( expr )`
    fn parse_grouped(&mut self) -> Option<Expr> {
        self.next(); // eat `(`
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(expr)
    }

    /// `if (cond) { ... } [else { ... }]`
    fn parse_if(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::LParen)?;
        self.next();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Some(Expr::new(
            ExprKind::If(Box::new(IfExpr {
                condition,
                consequence,
                alternative,
            })),
            token,
        ))
    }

    /// `fn (params) { body }`
    fn parse_function(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::LParen)?;
        let params = self.parse_parameters()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        Some(Expr::new(
            ExprKind::Function(Box::new(FunctionExpr { params, body })),
            token,
        ))
    }

    /// Parameter names with `cur` on the `(`. Leaves `cur` on the `)`.
    fn parse_parameters(&mut self) -> Option<Vec<Ident>> {
        let mut params = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next();
            return Some(params);
        }
        loop {
            self.expect_peek(TokenKind::Ident)?;
            params.push(Ident::from_token(self.cur.clone()));
            match self.peek.kind {
                TokenKind::Comma => self.next(),
                TokenKind::RParen => {
                    self.next();
                    return Some(params);
                }
                _ => {
                    self.peek_error("',' or ')'");
                    return None;
                }
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Infix Position
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_binary(&mut self, left: Expr, op: BinOp, precedence: Precedence) -> Option<Expr> {
        let token = self.cur.clone();
        self.next();
        let right = self.parse_expression(precedence)?;
        Some(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            token,
        ))
    }

    /// `callee(args)` with `cur` on the `(`.
    fn parse_call(&mut self, callee: Expr) -> Option<Expr> {
        let token = self.cur.clone();
        let args = self.parse_call_arguments()?;
        Some(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            token,
        ))
    }

    /// Argument expressions with `cur` on the `(`. Leaves `cur` on the `)`.
    fn parse_call_arguments(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next();
            return Some(args);
        }
        self.next();
        args.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next();
            self.next();
            args.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.peek_is(TokenKind::RParen) {
            self.peek_error("',' or ')'");
            return None;
        }
        self.next();
        Some(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::Lowest < Precedence::Equality);
        assert!(Precedence::Equality < Precedence::Comparison);
        assert!(Precedence::Comparison < Precedence::Sum);
        assert!(Precedence::Sum < Precedence::Product);
        assert!(Precedence::Product < Precedence::Prefix);
        assert!(Precedence::Prefix < Precedence::Call);
    }

    #[test]
    fn test_precedence_of_tokens() {
        assert_eq!(Precedence::of(TokenKind::Equals), Precedence::Equality);
        assert_eq!(Precedence::of(TokenKind::GreaterThan), Precedence::Comparison);
        assert_eq!(Precedence::of(TokenKind::Minus), Precedence::Sum);
        assert_eq!(Precedence::of(TokenKind::Slash), Precedence::Product);
        assert_eq!(Precedence::of(TokenKind::LParen), Precedence::Call);
        assert_eq!(Precedence::of(TokenKind::Semicolon), Precedence::Lowest);
        assert_eq!(Precedence::of(TokenKind::Increment), Precedence::Lowest);
    }
}
