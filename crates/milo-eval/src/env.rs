//! Variable environment for the Milo evaluator.

use crate::value::Object;
use std::collections::BTreeMap;

/// A single flat name → value table alive for the whole run.
///
/// There are no nested scopes: every `let` writes here and later
/// bindings overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: BTreeMap<String, Object>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous value.
    pub fn set(&mut self, name: &str, value: Object) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bindings, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut env = Environment::new();
        env.set("a", Object::number(1.0));
        env.set("a", Object::Boolean(true));
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("a").and_then(Object::as_bool), Some(true));
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut env = Environment::new();
        env.set("b", Object::Null);
        env.set("a", Object::Null);
        let names: Vec<&str> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!env.contains("c"));
    }
}
