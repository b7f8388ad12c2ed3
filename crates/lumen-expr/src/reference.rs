//! Read/write references produced by nodes.

use crate::{EvalError, EvalResult, Namespace, TypedValue, Value};

/// A capability to read, and possibly write, the location a node refers to.
///
/// Produced fresh on every call; never cached by the node. Reading never
/// touches the backing store and writability is fixed at creation.
pub enum ValueRef<'a> {
    /// A snapshot of a context object. Not writable.
    Context(TypedValue),
    /// A named variable. Reads return the snapshot taken at creation; writes
    /// go to the namespace.
    Variable {
        name: &'a str,
        value: TypedValue,
        namespace: &'a dyn Namespace,
    },
}

impl<'a> ValueRef<'a> {
    pub fn value(&self) -> &TypedValue {
        match self {
            ValueRef::Context(value) => value,
            ValueRef::Variable { value, .. } => value,
        }
    }

    pub fn read(&self) -> TypedValue {
        self.value().clone()
    }

    /// Write a new value. The snapshot held by this reference is not updated.
    pub fn write(&self, new_value: Option<Value>) -> EvalResult<()> {
        match self {
            ValueRef::Context(value) => Err(EvalError::NotAssignable {
                target: format!("context object {}", value),
            }),
            ValueRef::Variable {
                name, namespace, ..
            } => namespace.set(name, new_value),
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, ValueRef::Variable { .. })
    }
}

impl std::fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueRef::Context(value) => f.debug_tuple("Context").field(value).finish(),
            ValueRef::Variable { name, value, .. } => f
                .debug_struct("Variable")
                .field("name", name)
                .field("value", value)
                .finish_non_exhaustive(),
        }
    }
}
