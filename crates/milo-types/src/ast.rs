//! AST node types for the Milo language.
//!
//! Every node keeps the token that introduced it and renders, through
//! [`Display`](fmt::Display), to a fully-parenthesized canonical string.
//! Re-parsing a rendered program yields a tree with the same rendering.
//! Recursive expression nodes are boxed to keep enum sizes reasonable.

use crate::token::Token;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Milo program: statements in evaluation order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Literal of the first statement's leading token, or `""` when empty.
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(Stmt::token_literal)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_statements(f, &self.statements)
    }
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

impl Ident {
    /// Build an identifier from its `IDENT` token.
    pub fn from_token(token: Token) -> Self {
        let name = token.literal.clone();
        Self { token, name }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name = expr;`
    Let(LetStatement),
    /// `return expr;`
    Return(ReturnStatement),
    /// `expr` with an optional trailing `;`
    Expr(ExpressionStatement),
}

impl Stmt {
    /// The token that introduced this statement.
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Let(s) => &s.token,
            Stmt::Return(s) => &s.token,
            Stmt::Expr(s) => &s.token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }

    /// Name of the statement kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Let(_) => "LetStatement",
            Stmt::Return(_) => "ReturnStatement",
            Stmt::Expr(_) => "ExpressionStatement",
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(s) => write!(f, "{} {} = {};", s.token.literal, s.name, s.value),
            Stmt::Return(s) => write!(f, "{} {};", s.token.literal, s.value),
            Stmt::Expr(s) => write!(f, "{}", s.expr),
        }
    }
}

/// `let name = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Ident,
    pub value: Expr,
}

/// `return value;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expr,
}

/// A bare expression used as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// First token of the expression.
    pub token: Token,
    pub expr: Expr,
}

/// `{ statements... }`, owned by the `if` branch or function that
/// introduced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The opening `{`.
    pub token: Token,
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        fmt_statements(f, &self.statements)?;
        f.write_str(" }")
    }
}

/// Render a statement sequence separated by single spaces.
///
/// An expression statement followed by another statement gets its `;`
/// back, otherwise `a; (b)` would re-parse as the call `a(b)`.
fn fmt_statements(f: &mut fmt::Formatter<'_>, statements: &[Stmt]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{stmt}")?;
        if matches!(stmt, Stmt::Expr(_)) && i + 1 < statements.len() {
            f.write_str(";")?;
        }
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// The token whose prefix or infix rule built this node: the literal
    /// itself, the operator, `if`, `fn`, or the call's `(`.
    pub token: Token,
}

impl Expr {
    pub fn new(kind: ExprKind, token: Token) -> Self {
        Self { kind, token }
    }

    pub fn token_literal(&self) -> &str {
        &self.token.literal
    }

    /// Name of the expression kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Ident(_) => "IdentExpr",
            ExprKind::Number(_) => "NumberExpr",
            ExprKind::String(_) => "StringExpr",
            ExprKind::Boolean(_) => "BooleanExpr",
            ExprKind::Prefix { .. } => "PrefixExpression",
            ExprKind::Binary { .. } => "BinaryExpression",
            ExprKind::If(_) => "IfExpr",
            ExprKind::Function(_) => "FunctionExpr",
            ExprKind::Call { .. } => "CallExpr",
        }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Atoms ──
    /// `my_var`
    Ident(String),
    /// `42`, `3.14`
    Number(f64),
    /// `"hello"`
    String(String),
    /// `true` / `false`
    Boolean(bool),

    // ── Operators ──
    /// `-x`, `!x`, `++x`, `--x`
    Prefix { op: PrefixOp, right: Box<Expr> },
    /// `a + b`, `a < b`, `a == b`, ...
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },

    // ── Compound ──
    /// `if (cond) { ... } [else { ... }]`
    If(Box<IfExpr>),
    /// `fn (params) { body }`
    Function(Box<FunctionExpr>),
    /// `callee(args...)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
}

/// `if (condition) consequence [else alternative]`
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Expr,
    pub consequence: Block,
    pub alternative: Option<Block>,
}

/// `fn (params) body`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub params: Vec<Ident>,
    pub body: Block,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Number(_) => f.write_str(&self.token.literal),
            ExprKind::String(s) => write_quoted(f, s),
            ExprKind::Boolean(b) => write!(f, "{b}"),
            ExprKind::Prefix { op, right } => write!(f, "({op}{right})"),
            ExprKind::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
            ExprKind::If(ie) => {
                write!(f, "if ({}) {}", ie.condition, ie.consequence)?;
                if let Some(alt) = &ie.alternative {
                    write!(f, " else {alt}")?;
                }
                Ok(())
            }
            ExprKind::Function(func) => {
                f.write_str("fn (")?;
                write_joined(f, &func.params)?;
                write!(f, ") {}", func.body)
            }
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_joined(f, args)?;
                f.write_str(")")
            }
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Write a string literal back in source form.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => write!(f, "{ch}")?,
        }
    }
    f.write_str("\"")
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
    /// `++x`
    Increment,
    /// `--x`
    Decrement,
}

impl PrefixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
            PrefixOp::Increment => "++",
            PrefixOp::Decrement => "--",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators (in precedence order, lowest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Equality
    Eq,
    NotEq,
    // Comparison
    Less,
    Greater,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Returns the operator symbol for rendering and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::synthetic(kind, literal)
    }

    fn num(n: f64) -> Expr {
        Expr::new(ExprKind::Number(n), tok(TokenKind::Number, &n.to_string()))
    }

    fn ident(name: &str) -> Ident {
        Ident::from_token(tok(TokenKind::Ident, name))
    }

    fn ident_expr(name: &str) -> Expr {
        Expr::new(ExprKind::Ident(name.into()), tok(TokenKind::Ident, name))
    }

    fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
        let token = tok(TokenKind::Plus, op.as_str());
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            token,
        )
    }

    fn expr_stmt(expr: Expr) -> Stmt {
        Stmt::Expr(ExpressionStatement {
            token: expr.token.clone(),
            expr,
        })
    }

    fn block(statements: Vec<Stmt>) -> Block {
        Block {
            token: tok(TokenKind::LBrace, "{"),
            statements,
        }
    }

    #[test]
    fn test_render_let_statement() {
        let program = Program {
            statements: vec![Stmt::Let(LetStatement {
                token: tok(TokenKind::Let, "let"),
                name: ident("myVar"),
                value: ident_expr("anotherVar"),
            })],
        };
        assert_eq!(program.to_string(), "let myVar = anotherVar;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_render_prefix_and_binary() {
        let neg = Expr::new(
            ExprKind::Prefix {
                op: PrefixOp::Neg,
                right: Box::new(num(1.0)),
            },
            tok(TokenKind::Minus, "-"),
        );
        assert_eq!(neg.to_string(), "(-1)");
        assert_eq!(binary(num(5.0), BinOp::Add, num(5.0)).to_string(), "(5 + 5)");
    }

    #[test]
    fn test_render_if_with_else() {
        let if_expr = Expr::new(
            ExprKind::If(Box::new(IfExpr {
                condition: binary(num(5.0), BinOp::Eq, num(5.0)),
                consequence: block(vec![expr_stmt(Expr::new(
                    ExprKind::Boolean(true),
                    tok(TokenKind::True, "true"),
                ))]),
                alternative: Some(block(vec![expr_stmt(Expr::new(
                    ExprKind::Boolean(false),
                    tok(TokenKind::False, "false"),
                ))])),
            })),
            tok(TokenKind::If, "if"),
        );
        assert_eq!(
            if_expr.to_string(),
            "if ((5 == 5)) { true } else { false }"
        );
        assert_eq!(if_expr.token_literal(), "if");
        assert_eq!(if_expr.kind_name(), "IfExpr");
    }

    #[test]
    fn test_render_function_and_call() {
        let func = Expr::new(
            ExprKind::Function(Box::new(FunctionExpr {
                params: vec![ident("x"), ident("y")],
                body: block(vec![expr_stmt(binary(
                    ident_expr("x"),
                    BinOp::Add,
                    ident_expr("y"),
                ))]),
            })),
            tok(TokenKind::Function, "fn"),
        );
        assert_eq!(func.to_string(), "fn (x, y) { (x + y) }");

        let call = Expr::new(
            ExprKind::Call {
                callee: Box::new(ident_expr("add")),
                args: vec![num(1.0), binary(num(2.0), BinOp::Mul, num(3.0))],
            },
            tok(TokenKind::LParen, "("),
        );
        assert_eq!(call.to_string(), "add(1, (2 * 3))");
    }

    #[test]
    fn test_render_empty_block_and_params() {
        let func = Expr::new(
            ExprKind::Function(Box::new(FunctionExpr {
                params: vec![],
                body: block(vec![]),
            })),
            tok(TokenKind::Function, "fn"),
        );
        assert_eq!(func.to_string(), "fn () { }");
    }

    #[test]
    fn test_render_string_escapes() {
        let s = Expr::new(
            ExprKind::String("say \"hi\"\n".into()),
            tok(TokenKind::String, "say \"hi\"\n"),
        );
        assert_eq!(s.to_string(), r#""say \"hi\"\n""#);
    }

    #[test]
    fn test_render_statement_sequence_separators() {
        let program = Program {
            statements: vec![
                expr_stmt(ident_expr("a")),
                expr_stmt(num(1.0)),
                Stmt::Return(ReturnStatement {
                    token: tok(TokenKind::Return, "return"),
                    value: ident_expr("a"),
                }),
            ],
        };
        assert_eq!(program.to_string(), "a; 1; return a;");
        assert_eq!(block(program.statements.clone()).to_string(), "{ a; 1; return a; }");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert_eq!(program.token_literal(), "");
        assert_eq!(program.to_string(), "");
        assert!(program.is_empty());
    }
}
