//! Variable references: `#this`, `#root` and `#name`.

use std::fmt;

use lumen_common::Span;

use crate::{
    CodeFlow, Descriptor, EvalError, EvalResult, ExitSignature, ExpressionState, Instruction,
    MethodEmitter, Node, TypedValue, ValueProducer, ValueRef, insert_check_cast,
};

/// The name a variable reference binds, resolved once at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableName {
    /// `#this`: the currently active context object.
    This,
    /// `#root`: the root context object.
    Root,
    /// Any other name, looked up in the namespace.
    Named(String),
}

impl VariableName {
    pub fn as_str(&self) -> &str {
        match self {
            VariableName::This => "this",
            VariableName::Root => "root",
            VariableName::Named(name) => name,
        }
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self, VariableName::Named(_))
    }
}

impl TryFrom<&str> for VariableName {
    type Error = EvalError;

    /// Resolve reference text. `this` and `root` always become the reserved
    /// variants; empty text is rejected.
    fn try_from(name: &str) -> EvalResult<Self> {
        match name {
            "" => Err(EvalError::InvalidIdentifier {
                reason: "variable name is empty".to_string(),
            }),
            "this" => Ok(VariableName::This),
            "root" => Ok(VariableName::Root),
            _ => Ok(VariableName::Named(name.to_string())),
        }
    }
}

/// A variable name together with where it was parsed from.
///
/// Only built through [`Identifier::new`], so the name is never empty and a
/// reserved word is never held as `Named`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    name: VariableName,
    span: Span,
}

impl Identifier {
    pub fn new(text: &str, span: Span) -> EvalResult<Self> {
        Ok(Self {
            name: VariableName::try_from(text)?,
            span,
        })
    }

    pub fn name(&self) -> &VariableName {
        &self.name
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A reference to a variable, e.g. `#root`, `#this`, `#someVar`.
#[derive(Debug)]
pub struct VariableReference {
    ident: Identifier,
    exit: ExitSignature,
}

impl VariableReference {
    pub fn new(name: &str, span: Span) -> EvalResult<Self> {
        Ok(Self::from_identifier(Identifier::new(name, span)?))
    }

    pub fn from_identifier(ident: Identifier) -> Self {
        Self {
            ident,
            exit: ExitSignature::new(),
        }
    }

    pub fn name(&self) -> &VariableName {
        &self.ident.name
    }

    pub fn identifier(&self) -> &Identifier {
        &self.ident
    }
}

impl Node for VariableReference {
    fn span(&self) -> Span {
        self.ident.span
    }

    fn value_ref<'a>(&'a self, state: &ExpressionState<'a>) -> EvalResult<ValueRef<'a>> {
        match &self.ident.name {
            VariableName::This => Ok(ValueRef::Context(state.active_context())),
            VariableName::Root => Ok(ValueRef::Context(state.root_context())),
            VariableName::Named(name) => {
                // A null snapshot means either bound to null or unbound
                // (under the lenient policy).
                let value = state.lookup_variable(name)?;
                Ok(ValueRef::Variable {
                    name,
                    value,
                    namespace: state.namespace(),
                })
            }
        }
    }

    fn value(&self, state: &ExpressionState<'_>) -> EvalResult<TypedValue> {
        let result = match &self.ident.name {
            VariableName::This => {
                let result = state.active_context();
                // Inside a nested scope (selection, projection) `#this` is not
                // the object compiled code would load, so no signature is
                // recorded and the node stays out of the compiled tier.
                if state.is_nested_scope() {
                    tracing::trace!(node = %self, "nested scope, exit signature not recorded");
                    return Ok(result);
                }
                result
            }
            VariableName::Root => state.root_context(),
            VariableName::Named(name) => state.lookup_variable(name)?,
        };
        self.exit.record(result.value());
        Ok(result)
    }

    fn set_value(&self, state: &ExpressionState<'_>, producer: ValueProducer<'_>) -> EvalResult<TypedValue> {
        match &self.ident.name {
            VariableName::Named(name) => state.assign_variable(name, producer),
            reserved => Err(EvalError::UnsupportedAssignment {
                name: reserved.as_str().to_string(),
            }),
        }
    }

    fn is_writable(&self) -> bool {
        !self.ident.name.is_reserved()
    }

    fn is_compilable(&self) -> bool {
        self.exit.is_set()
    }

    fn exit_descriptor(&self) -> Option<Descriptor> {
        self.exit.get()
    }

    fn generate_code(&self, emitter: &mut dyn MethodEmitter, flow: &mut CodeFlow) -> EvalResult<()> {
        let descriptor = self.exit.get().ok_or_else(|| EvalError::NotCompilable {
            node: self.to_string(),
        })?;

        match &self.ident.name {
            VariableName::This | VariableName::Root => {
                emitter.emit(Instruction::LoadLocal(flow.context_slot()));
            }
            VariableName::Named(name) => {
                emitter.emit(Instruction::LoadLocal(flow.namespace_slot()));
                emitter.emit(Instruction::PushString(name.as_str().into()));
                emitter.emit(Instruction::LookupVariable);
            }
        }
        insert_check_cast(emitter, &descriptor);
        flow.push_descriptor(descriptor);
        Ok(())
    }
}

impl fmt::Display for VariableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.ident.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, StandardNamespace, Value};
    use std::cell::Cell;

    fn var(name: &str) -> VariableReference {
        VariableReference::new(name, Span::DUMMY).unwrap()
    }

    #[test]
    fn test_reserved_names_resolve_at_construction() {
        assert_eq!(var("this").name(), &VariableName::This);
        assert_eq!(var("root").name(), &VariableName::Root);
        assert_eq!(var("self").name(), &VariableName::Named("self".into()));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            VariableReference::new("", Span::DUMMY),
            Err(EvalError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            VariableName::try_from(""),
            Err(EvalError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_identifier_never_holds_reserved_word_as_named() {
        for (text, expected) in [("this", VariableName::This), ("root", VariableName::Root)] {
            let ident = Identifier::new(text, Span::DUMMY).unwrap();
            assert_eq!(ident.name(), &expected);

            let node = VariableReference::from_identifier(ident);
            assert!(!node.is_writable());
            assert_eq!(node.to_string(), format!("#{}", text));
        }

        let ident = Identifier::new("This", Span::from_usize(0, 4)).unwrap();
        assert_eq!(ident.name(), &VariableName::Named("This".into()));
        assert_eq!(ident.span(), Span::from_usize(0, 4));
    }

    #[test]
    fn test_from_identifier_through_reserved_name_uses_context() {
        let ns = StandardNamespace::new().with_variable("this", Value::Int(9));
        let state = ExpressionState::new(TypedValue::new(Value::from("ctx")), &ns);
        let node = VariableReference::from_identifier(Identifier::new("this", Span::DUMMY).unwrap());

        assert_eq!(node.value(&state).unwrap(), TypedValue::new(Value::from("ctx")));
        let err = node
            .set_value(&state, Box::new(|| Ok(TypedValue::new(Value::Int(1)))))
            .unwrap_err();
        assert_eq!(err, EvalError::UnsupportedAssignment { name: "this".into() });
    }

    #[test]
    fn test_value_ref_variants() {
        let ns = StandardNamespace::new().with_variable("x", Value::Int(1));
        let state = ExpressionState::new(TypedValue::new(Value::from("ctx")), &ns);

        let this = var("this");
        let r = this.value_ref(&state).unwrap();
        assert!(!r.is_writable());
        assert_eq!(r.read(), TypedValue::new(Value::from("ctx")));

        let x = var("x");
        let r = x.value_ref(&state).unwrap();
        assert!(r.is_writable());
        assert_eq!(r.read(), TypedValue::new(Value::Int(1)));
    }

    #[test]
    fn test_value_ref_does_not_record_signature() {
        let ns = StandardNamespace::new().with_variable("x", Value::Int(1));
        let state = ExpressionState::new(TypedValue::NULL, &ns);
        let x = var("x");
        x.value_ref(&state).unwrap();
        assert!(!x.is_compilable());
    }

    #[test]
    fn test_assign_to_reserved_never_runs_producer() {
        let ns = StandardNamespace::new();
        let state = ExpressionState::new(TypedValue::NULL, &ns);
        let called = Cell::new(false);
        for name in ["this", "root"] {
            let err = var(name)
                .set_value(
                    &state,
                    Box::new(|| {
                        called.set(true);
                        Ok(TypedValue::NULL)
                    }),
                )
                .unwrap_err();
            assert_eq!(err, EvalError::UnsupportedAssignment { name: name.into() });
        }
        assert!(!called.get());
    }

    #[test]
    fn test_generate_code_before_evaluation_fails() {
        let mut code = Vec::new();
        let mut flow = CodeFlow::new(&EngineConfig::default());
        let err = var("x").generate_code(&mut code, &mut flow).unwrap_err();
        assert_eq!(err, EvalError::NotCompilable { node: "#x".into() });
        assert!(code.is_empty());
        assert_eq!(flow.depth(), 0);
    }

    #[test]
    fn test_generate_code_for_root_loads_context_slot() {
        let ns = StandardNamespace::new();
        let state = ExpressionState::new(TypedValue::new(Value::Int(9)), &ns);
        let root = var("root");
        root.value(&state).unwrap();

        let mut code = Vec::new();
        let mut flow = CodeFlow::new(&EngineConfig::default());
        root.generate_code(&mut code, &mut flow).unwrap();
        assert_eq!(
            code,
            vec![Instruction::LoadLocal(1), Instruction::CheckCast(Descriptor::Int)]
        );
        assert_eq!(flow.last_descriptor(), Some(&Descriptor::Int));
    }
}
