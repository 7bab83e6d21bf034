//! Runtime error types for the Milo evaluator.

use crate::value::ObjectType;
use milo_types::ast::{BinOp, PrefixOp};
use milo_types::Span;
use std::fmt;

/// Evaluation error: the reason a single top-level statement failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Identifier with no binding in the environment
    #[error("invalid reference: {0} is nil")]
    UnresolvedReference(String),
    /// `!` on a non-boolean, `-`/`++`/`--` on a non-number
    #[error("invalid operand {operand} for prefix {op}")]
    InvalidPrefixOperand { op: PrefixOp, operand: String },
    /// Arithmetic or comparison on something other than two numbers
    #[error("invalid operand(s) for \"{op}\": {left} and {right}")]
    InvalidOperands {
        op: BinOp,
        left: ObjectType,
        right: ObjectType,
    },
    /// Operator that parses but has no evaluation rule (`==`, `!=`)
    #[error("invalid operator for binary expression {0}")]
    UnsupportedOperator(BinOp),
    /// Call target that is not a registered builtin
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    /// Expression kind with no evaluation rule
    #[error("invalid expression type: {0}")]
    InvalidExpressionType(&'static str),
    /// Top-level statement kind the evaluator does not run
    #[error("unexpected statement: {0}")]
    UnsupportedStatement(String),
    /// Builtin called with too few arguments
    #[error("{name} expects at least {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// An [`EvalError`] tied to the top-level statement that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementError {
    /// Position of the statement in the program.
    pub index: usize,
    /// Span of the statement's first token.
    pub span: Span,
    pub error: EvalError,
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: runtime error: {}", self.span, self.error)
    }
}

impl std::error::Error for StatementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
