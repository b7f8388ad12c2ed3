//! Variable namespaces.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{EvalError, EvalResult, TypedValue, Value};

/// Deferred right-hand side of an assignment. The namespace decides whether
/// and when to call it; it can be called at most once.
pub type ValueProducer<'a> = Box<dyn FnOnce() -> EvalResult<TypedValue> + 'a>;

/// The store that named variable lookups and assignments target.
///
/// Errors returned by an implementation reach the caller of the evaluation
/// unchanged.
pub trait Namespace {
    /// Look up a binding. `Ok(None)` means the name is unbound; a name bound
    /// to null yields `Ok(Some(TypedValue::NULL))`.
    fn lookup(&self, name: &str) -> EvalResult<Option<TypedValue>>;

    /// Assign the result of `producer` to `name`, returning the stored value.
    fn assign(&self, name: &str, producer: ValueProducer<'_>) -> EvalResult<TypedValue>;

    /// Store an already computed value.
    fn set(&self, name: &str, value: Option<Value>) -> EvalResult<()>;
}

/// A thread-safe in-memory namespace.
#[derive(Debug, Default)]
pub struct StandardNamespace {
    bindings: RwLock<HashMap<String, TypedValue>>,
    read_only: bool,
}

impl StandardNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A namespace whose bindings are fixed at construction.
    pub fn read_only(bindings: HashMap<String, TypedValue>) -> Self {
        Self {
            bindings: RwLock::new(bindings),
            read_only: true,
        }
    }

    /// Add a binding while building the namespace.
    pub fn with_variable(self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        if let Ok(mut bindings) = self.bindings.write() {
            bindings.insert(name.into(), value.into());
        }
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Names currently bound, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.bindings.read() {
            Ok(bindings) => bindings.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    fn store(&self, name: &str, value: TypedValue) -> EvalResult<()> {
        let mut bindings = self
            .bindings
            .write()
            .map_err(|_| EvalError::Namespace("variable table is poisoned".to_string()))?;
        bindings.insert(name.to_string(), value);
        Ok(())
    }

    fn ensure_writable(&self, name: &str) -> EvalResult<()> {
        if self.read_only {
            return Err(EvalError::ReadOnlyNamespace {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl Namespace for StandardNamespace {
    fn lookup(&self, name: &str) -> EvalResult<Option<TypedValue>> {
        let bindings = self
            .bindings
            .read()
            .map_err(|_| EvalError::Namespace("variable table is poisoned".to_string()))?;
        Ok(bindings.get(name).cloned())
    }

    fn assign(&self, name: &str, producer: ValueProducer<'_>) -> EvalResult<TypedValue> {
        self.ensure_writable(name)?;
        // The producer may itself read this namespace; no lock is held here.
        let value = producer()?;
        self.store(name, value.clone())?;
        Ok(value)
    }

    fn set(&self, name: &str, value: Option<Value>) -> EvalResult<()> {
        self.ensure_writable(name)?;
        self.store(name, TypedValue::from_option(value))
    }
}

impl From<HashMap<String, TypedValue>> for StandardNamespace {
    fn from(bindings: HashMap<String, TypedValue>) -> Self {
        Self {
            bindings: RwLock::new(bindings),
            read_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_lookup_distinguishes_unbound_from_null() {
        let ns = StandardNamespace::new().with_variable("nothing", TypedValue::NULL);
        assert_eq!(ns.lookup("nothing").unwrap(), Some(TypedValue::NULL));
        assert_eq!(ns.lookup("missing").unwrap(), None);
    }

    #[test]
    fn test_assign_runs_producer_once() {
        let ns = StandardNamespace::new();
        let calls = Cell::new(0);
        let stored = ns
            .assign(
                "x",
                Box::new(|| {
                    calls.set(calls.get() + 1);
                    Ok(TypedValue::new(Value::Int(5)))
                }),
            )
            .unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(stored.value(), Some(&Value::Int(5)));
        assert_eq!(ns.lookup("x").unwrap(), Some(TypedValue::new(Value::Int(5))));
    }

    #[test]
    fn test_producer_can_read_namespace() {
        let ns = StandardNamespace::new().with_variable("a", Value::Int(1));
        ns.assign("b", Box::new(|| Ok(ns.lookup("a")?.unwrap_or(TypedValue::NULL))))
            .unwrap();
        assert_eq!(ns.lookup("b").unwrap(), Some(TypedValue::new(Value::Int(1))));
    }

    #[test]
    fn test_read_only_rejects_writes_without_evaluating() {
        let ns = StandardNamespace::read_only(HashMap::new());
        let called = Cell::new(false);
        let err = ns
            .assign(
                "x",
                Box::new(|| {
                    called.set(true);
                    Ok(TypedValue::NULL)
                }),
            )
            .unwrap_err();
        assert_eq!(err, EvalError::ReadOnlyNamespace { name: "x".into() });
        assert!(!called.get());
        assert!(ns.set("x", None).is_err());
    }

    #[test]
    fn test_producer_error_leaves_binding_untouched() {
        let ns = StandardNamespace::new().with_variable("x", Value::Int(1));
        let err = ns
            .assign("x", Box::new(|| Err(EvalError::Namespace("rhs failed".into()))))
            .unwrap_err();
        assert_eq!(err, EvalError::Namespace("rhs failed".into()));
        assert_eq!(ns.lookup("x").unwrap(), Some(TypedValue::new(Value::Int(1))));
    }

    #[test]
    fn test_names_sorted() {
        let ns = StandardNamespace::new()
            .with_variable("b", Value::Int(1))
            .with_variable("a", Value::Int(2));
        assert_eq!(ns.names(), vec!["a".to_string(), "b".to_string()]);
    }
}
