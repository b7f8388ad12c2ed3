//! Per-evaluation state.

use std::sync::Arc;

use crate::{
    EngineConfig, EvalError, EvalResult, Namespace, TypedValue, UnboundPolicy, ValueProducer,
};

/// The state one evaluation runs against: the root context object, a stack
/// of active context objects for nested scopes, and the variable namespace.
///
/// A state is created per evaluation and is never shared between threads;
/// the nodes it is passed to may be.
pub struct ExpressionState<'a> {
    root: Arc<TypedValue>,
    scopes: Vec<Arc<TypedValue>>,
    namespace: &'a dyn Namespace,
    config: EngineConfig,
}

impl<'a> ExpressionState<'a> {
    pub fn new(root: TypedValue, namespace: &'a dyn Namespace) -> Self {
        Self {
            root: Arc::new(root),
            scopes: Vec::new(),
            namespace,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn namespace(&self) -> &'a dyn Namespace {
        self.namespace
    }

    /// The object `#this` refers to: the innermost pushed scope, or the root.
    pub fn active_context(&self) -> TypedValue {
        self.active().as_ref().clone()
    }

    pub fn root_context(&self) -> TypedValue {
        self.root.as_ref().clone()
    }

    /// True while the active context is a different object from the root.
    ///
    /// This compares identity, not value: a pushed scope holding a value equal
    /// to the root is still nested, while [`Self::push_root_scope`] is not.
    pub fn is_nested_scope(&self) -> bool {
        !Arc::ptr_eq(self.active(), &self.root)
    }

    /// Enter a nested scope (e.g. one element of a selection).
    pub fn push_active_context(&mut self, context: TypedValue) {
        self.scopes.push(Arc::new(context));
    }

    /// Enter a scope whose active context is the root object itself.
    pub fn push_root_scope(&mut self) {
        self.scopes.push(Arc::clone(&self.root));
    }

    pub fn pop_active_context(&mut self) -> Option<TypedValue> {
        self.scopes.pop().map(|scope| scope.as_ref().clone())
    }

    /// Look up a named variable, applying the configured unbound policy.
    pub fn lookup_variable(&self, name: &str) -> EvalResult<TypedValue> {
        match self.namespace.lookup(name)? {
            Some(value) => Ok(value),
            None => match self.config.unbound {
                UnboundPolicy::Lenient => Ok(TypedValue::NULL),
                UnboundPolicy::Strict => Err(EvalError::UnboundVariable {
                    name: name.to_string(),
                }),
            },
        }
    }

    /// Assign to a named variable through the namespace.
    pub fn assign_variable(&self, name: &str, producer: ValueProducer<'_>) -> EvalResult<TypedValue> {
        self.namespace.assign(name, producer)
    }

    fn active(&self) -> &Arc<TypedValue> {
        self.scopes.last().unwrap_or(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StandardNamespace, Value};

    #[test]
    fn test_active_defaults_to_root() {
        let ns = StandardNamespace::new();
        let state = ExpressionState::new(TypedValue::new(Value::Int(1)), &ns);
        assert!(!state.is_nested_scope());
        assert_eq!(state.active_context(), state.root_context());
    }

    #[test]
    fn test_nested_scope_compares_identity() {
        let ns = StandardNamespace::new();
        let mut state = ExpressionState::new(TypedValue::new(Value::Int(1)), &ns);

        // Equal value, different object.
        state.push_active_context(TypedValue::new(Value::Int(1)));
        assert!(state.is_nested_scope());

        state.push_root_scope();
        assert!(!state.is_nested_scope());

        state.pop_active_context();
        assert!(state.is_nested_scope());
        state.pop_active_context();
        assert!(!state.is_nested_scope());
        assert_eq!(state.pop_active_context(), None);
    }

    #[test]
    fn test_lookup_policies() {
        let ns = StandardNamespace::new().with_variable("nil", TypedValue::NULL);
        let lenient = ExpressionState::new(TypedValue::NULL, &ns);
        assert_eq!(lenient.lookup_variable("missing").unwrap(), TypedValue::NULL);
        assert_eq!(lenient.lookup_variable("nil").unwrap(), TypedValue::NULL);

        let strict = ExpressionState::new(TypedValue::NULL, &ns)
            .with_config(EngineConfig::new().unbound(UnboundPolicy::Strict));
        assert_eq!(
            strict.lookup_variable("missing").unwrap_err(),
            EvalError::UnboundVariable { name: "missing".into() }
        );
        assert_eq!(strict.lookup_variable("nil").unwrap(), TypedValue::NULL);
    }
}
