//! Runtime values.

use milo_types::ast::Stmt;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A runtime value.
///
/// Cloning an `Object` never copies a number: both clones share one
/// cell, so `++`/`--` through any alias is seen by every other.
#[derive(Debug, Clone)]
pub enum Object {
    Number(Rc<Cell<f64>>),
    String(String),
    Boolean(bool),
    Function(Rc<Function>),
    Null,
}

/// A function literal's runtime form: parameter names and the body
/// statements. No environment is captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

/// Type tag of an [`Object`], used in error messages and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Number,
    String,
    Boolean,
    Function,
    Null,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Function => "FUNC",
            Self::Null => "NULL",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Object {
    /// A fresh, unshared number.
    pub fn number(value: f64) -> Self {
        Self::Number(Rc::new(Cell::new(value)))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Number(_) => ObjectType::Number,
            Self::String(_) => ObjectType::String,
            Self::Boolean(_) => ObjectType::Boolean,
            Self::Function(_) => ObjectType::Function,
            Self::Null => ObjectType::Null,
        }
    }

    /// Current value if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(cell) => Some(cell.get()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `true` if both are the same shared number cell.
    pub fn shares_number_with(&self, other: &Object) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(cell) => write_number(f, cell.get()),
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Function(_) => f.write_str("function"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Shortest decimal form with no exponent; `+Inf`, `-Inf` and `NaN` for
/// the non-finite values.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        write!(f, "{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_rendering() {
        assert_eq!(Object::number(5.0).to_string(), "5");
        assert_eq!(Object::number(-2.5).to_string(), "-2.5");
        assert_eq!(Object::number(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Object::number(1e21).to_string(), "1000000000000000000000");
        assert_eq!(Object::number(f64::INFINITY).to_string(), "+Inf");
        assert_eq!(Object::number(f64::NEG_INFINITY).to_string(), "-Inf");
        assert_eq!(Object::number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_other_renderings() {
        assert_eq!(Object::String("hi there".into()).to_string(), "hi there");
        assert_eq!(Object::Boolean(false).to_string(), "false");
        assert_eq!(Object::Null.to_string(), "null");
        let func = Object::Function(Rc::new(Function {
            params: vec!["x".into()],
            body: Vec::new(),
        }));
        assert_eq!(func.to_string(), "function");
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Object::number(1.0).object_type().to_string(), "NUMBER");
        assert_eq!(Object::String(String::new()).object_type().to_string(), "STRING");
        assert_eq!(Object::Boolean(true).object_type().to_string(), "BOOLEAN");
        assert_eq!(Object::Null.object_type().to_string(), "NULL");
    }

    #[test]
    fn test_clones_share_numbers() {
        let a = Object::number(5.0);
        let b = a.clone();
        if let Object::Number(cell) = &a {
            cell.set(6.0);
        }
        assert_eq!(b.as_number(), Some(6.0));
        assert!(a.shares_number_with(&b));
        assert!(!a.shares_number_with(&Object::number(6.0)));
    }
}
