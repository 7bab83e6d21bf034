//! Core expression and statement evaluator.

use crate::builtins::Builtins;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult, StatementError};
use crate::value::{Function, Object};
use milo_types::ast::*;
use std::rc::Rc;
use tracing::{debug, warn};

/// The core evaluator: walks a parsed [`Program`] once, top to bottom.
///
/// A failing statement records a [`StatementError`] and evaluation
/// continues with the next one. Bindings made by earlier statements are
/// kept.
pub struct Evaluator<'p> {
    program: &'p Program,
    /// Flat variable environment.
    env: Environment,
    builtins: Builtins,
    /// Rendered values and `print` output, in emission order.
    output: Vec<String>,
    errors: Vec<StatementError>,
}

impl<'p> Evaluator<'p> {
    /// Create an evaluator with an empty environment and the standard
    /// builtins.
    pub fn new(program: &'p Program) -> Self {
        Self::with_builtins(program, Builtins::default())
    }

    pub fn with_builtins(program: &'p Program, builtins: Builtins) -> Self {
        Self {
            program,
            env: Environment::new(),
            builtins,
            output: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn errors(&self) -> &[StatementError] {
        &self.errors
    }

    /// Take the collected output, environment and errors.
    pub fn into_parts(self) -> (Vec<String>, Environment, Vec<StatementError>) {
        (self.output, self.env, self.errors)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate every top-level statement in order.
    #[tracing::instrument(skip(self), fields(statements = self.program.len()))]
    pub fn evaluate(&mut self) {
        let program = self.program;
        for (index, stmt) in program.statements.iter().enumerate() {
            debug!(index, kind = stmt.kind_name(), "evaluating statement");
            if let Err(error) = self.eval_top_level(stmt) {
                warn!(index, %error, "statement failed");
                self.errors.push(StatementError {
                    index,
                    span: stmt.token().span,
                    error,
                });
            }
        }
    }

    fn eval_top_level(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match stmt {
            Stmt::Expr(s) => {
                let value = self.eval_expr(&s.expr)?;
                if !matches!(value, Object::Null | Object::Function(_)) {
                    self.output.push(value.to_string());
                }
                Ok(())
            }
            Stmt::Let(s) => {
                let value = self.eval_expr(&s.value)?;
                debug!(name = %s.name, value = %value, "bound");
                self.env.set(&s.name.name, value);
                Ok(())
            }
            Stmt::Return(s) => Err(EvalError::UnsupportedStatement(s.token.literal.clone())),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression against the current environment.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Object> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Object::number(*n)),
            ExprKind::String(s) => Ok(Object::String(s.clone())),
            ExprKind::Boolean(b) => Ok(Object::Boolean(*b)),
            ExprKind::Ident(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnresolvedReference(name.clone())),
            ExprKind::Function(func) => Ok(Object::Function(Rc::new(Function {
                params: func.params.iter().map(|p| p.name.clone()).collect(),
                body: func.body.statements.clone(),
            }))),
            ExprKind::Prefix { op, right } => self.eval_prefix(*op, right),
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::If(_) => Err(EvalError::InvalidExpressionType(expr.kind_name())),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_prefix(&mut self, op: PrefixOp, right: &Expr) -> EvalResult<Object> {
        let operand = self.eval_expr(right)?;
        match (op, &operand) {
            (PrefixOp::Not, Object::Boolean(b)) => Ok(Object::Boolean(!b)),
            (PrefixOp::Neg, Object::Number(cell)) => Ok(Object::number(-cell.get())),
            (PrefixOp::Increment, Object::Number(cell)) => {
                cell.set(cell.get() + 1.0);
                Ok(Object::Number(Rc::clone(cell)))
            }
            (PrefixOp::Decrement, Object::Number(cell)) => {
                cell.set(cell.get() - 1.0);
                Ok(Object::Number(Rc::clone(cell)))
            }
            _ => Err(EvalError::InvalidPrefixOperand {
                op,
                operand: operand.to_string(),
            }),
        }
    }

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Object> {
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        let apply: fn(f64, f64) -> Object = match op {
            BinOp::Add => |l, r| Object::number(l + r),
            BinOp::Sub => |l, r| Object::number(l - r),
            BinOp::Mul => |l, r| Object::number(l * r),
            BinOp::Div => |l, r| Object::number(l / r),
            BinOp::Less => |l, r| Object::Boolean(l < r),
            BinOp::Greater => |l, r| Object::Boolean(l > r),
            BinOp::Eq | BinOp::NotEq => return Err(EvalError::UnsupportedOperator(op)),
        };

        match (lv.as_number(), rv.as_number()) {
            (Some(l), Some(r)) => Ok(apply(l, r)),
            _ => Err(EvalError::InvalidOperands {
                op,
                left: lv.object_type(),
                right: rv.object_type(),
            }),
        }
    }

    // ── Calls ────────────────────────────────────────────────────────────

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> EvalResult<Object> {
        let values = args
            .iter()
            .map(|arg| self.eval_expr(arg))
            .collect::<EvalResult<Vec<_>>>()?;

        let builtin = match &callee.kind {
            ExprKind::Ident(name) => self.builtins.get(name),
            _ => None,
        };
        match builtin {
            Some(function) => function(&values, &mut self.output),
            None => Err(EvalError::UnknownFunction(callee.to_string())),
        }
    }
}
