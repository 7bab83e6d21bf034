//! Native functions callable by name from Milo code.

use crate::error::{EvalError, EvalResult};
use crate::value::Object;
use std::collections::BTreeMap;

/// Signature of a native function: the evaluated arguments and the
/// output sink, returning one value (possibly `Null`).
pub type BuiltinFn = fn(&[Object], &mut Vec<String>) -> EvalResult<Object>;

/// Name-keyed table of native functions.
#[derive(Debug, Clone)]
pub struct Builtins {
    table: BTreeMap<&'static str, BuiltinFn>,
}

impl Builtins {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Register (or replace) a builtin.
    pub fn register(&mut self, name: &'static str, function: BuiltinFn) {
        self.table.insert(name, function);
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.table.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }
}

impl Default for Builtins {
    /// The standard registry: `print`.
    fn default() -> Self {
        let mut builtins = Self::empty();
        builtins.register("print", print);
        builtins
    }
}

// ── Standard builtins ────────────────────────────────────────────────────────

/// `print(value)`: emit the render of the first argument.
fn print(args: &[Object], out: &mut Vec<String>) -> EvalResult<Object> {
    let Some(first) = args.first() else {
        return Err(EvalError::Arity {
            name: "print".into(),
            expected: 1,
            got: 0,
        });
    };
    out.push(first.to_string());
    Ok(Object::Null)
}
