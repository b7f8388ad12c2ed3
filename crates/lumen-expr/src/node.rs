//! The node evaluation contract.

use std::fmt;

use lumen_common::Span;

use crate::{
    CodeFlow, Descriptor, EvalError, EvalResult, ExpressionState, MethodEmitter, TypedValue,
    ValueProducer, ValueRef,
};

/// An expression node with both an interpreted and a compiled form.
///
/// Nodes are immutable after parsing apart from their exit signature and
/// may be evaluated from several threads against independent states.
/// `Display` renders the node's canonical source form.
pub trait Node: fmt::Display + Send + Sync {
    fn span(&self) -> Span;

    /// Produce a reference to the location this node denotes.
    fn value_ref<'a>(&'a self, state: &ExpressionState<'a>) -> EvalResult<ValueRef<'a>>;

    /// Evaluate in interpreted mode.
    fn value(&self, state: &ExpressionState<'_>) -> EvalResult<TypedValue>;

    /// Assign the value produced by `producer`.
    fn set_value(&self, _state: &ExpressionState<'_>, _producer: ValueProducer<'_>) -> EvalResult<TypedValue> {
        Err(EvalError::NotAssignable {
            target: self.to_string(),
        })
    }

    fn is_writable(&self) -> bool {
        false
    }

    /// Whether [`Node::generate_code`] can run.
    fn is_compilable(&self) -> bool {
        false
    }

    /// The static type compiled code for this node leaves on the stack.
    fn exit_descriptor(&self) -> Option<Descriptor> {
        None
    }

    /// Emit instructions leaving exactly one value of
    /// [`Node::exit_descriptor`] on the stack.
    fn generate_code(&self, emitter: &mut dyn MethodEmitter, flow: &mut CodeFlow) -> EvalResult<()>;

    fn to_ast_string(&self) -> String {
        self.to_string()
    }
}
