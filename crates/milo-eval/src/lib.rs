//! Milo tree-walking evaluator.
//!
//! Runs a parsed program directly from the AST against a single flat
//! environment, collecting output lines and per-statement errors.

mod builtins;
mod env;
mod error;
mod evaluator;
mod value;

pub use builtins::{BuiltinFn, Builtins};
pub use env::Environment;
pub use error::{EvalError, EvalResult, StatementError};
pub use evaluator::Evaluator;
pub use value::{Function, Object, ObjectType};
