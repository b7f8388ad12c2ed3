//! Evaluation errors.

use lumen_common::Span;
use lumen_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use thiserror::Error;

use crate::Descriptor;

/// Errors raised while evaluating, assigning, or compiling expression nodes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("cannot assign to reserved reference `#{name}`")]
    UnsupportedAssignment { name: String },

    #[error("{target} is not assignable")]
    NotAssignable { target: String },

    #[error("variable `{name}` is not bound")]
    UnboundVariable { name: String },

    #[error("namespace is read-only, cannot write `{name}`")]
    ReadOnlyNamespace { name: String },

    /// A failure raised by a namespace implementation, passed through as-is.
    #[error("{0}")]
    Namespace(String),

    #[error("`{node}` cannot be compiled before its exit type is known")]
    NotCompilable { node: String },

    #[error("illegal access to non-public type `{type_name}`")]
    IllegalAccess { type_name: String },

    #[error("cannot cast value of type `{found}` to `{expected}`")]
    ClassCast { expected: Descriptor, found: String },

    #[error("compiled program left {depth} values on the stack")]
    StackImbalance { depth: usize },

    #[error("compiled program popped an operand of the wrong kind or from an empty stack")]
    StackUnderflow,

    #[error("local slot {slot} is not bound in the compiled frame")]
    InvalidSlot { slot: u16 },

    #[error("context and namespace handle both use local slot {slot}")]
    SlotConflict { slot: u16 },

    #[error("invalid identifier: {reason}")]
    InvalidIdentifier { reason: String },
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::UnsupportedAssignment { .. } => ErrorCode::UnsupportedAssignment,
            EvalError::NotAssignable { .. } => ErrorCode::NotAssignable,
            EvalError::UnboundVariable { .. } => ErrorCode::UnboundVariable,
            EvalError::ReadOnlyNamespace { .. } => ErrorCode::ReadOnlyNamespace,
            EvalError::Namespace(_) => ErrorCode::NamespaceFailure,
            EvalError::NotCompilable { .. } => ErrorCode::NotCompilable,
            EvalError::IllegalAccess { .. } => ErrorCode::IllegalAccess,
            EvalError::ClassCast { .. } => ErrorCode::ClassCast,
            EvalError::StackImbalance { .. } | EvalError::StackUnderflow => ErrorCode::StackImbalance,
            EvalError::InvalidSlot { .. } | EvalError::SlotConflict { .. } => ErrorCode::InvalidSlot,
            EvalError::InvalidIdentifier { .. } => ErrorCode::EmptyIdentifier,
        }
    }

    fn kind(&self) -> DiagnosticKind {
        match self {
            EvalError::InvalidIdentifier { .. } => DiagnosticKind::Syntax,
            EvalError::NotCompilable { .. }
            | EvalError::IllegalAccess { .. }
            | EvalError::ClassCast { .. }
            | EvalError::StackImbalance { .. }
            | EvalError::StackUnderflow
            | EvalError::InvalidSlot { .. }
            | EvalError::SlotConflict { .. } => DiagnosticKind::Compile,
            _ => DiagnosticKind::Eval,
        }
    }

    /// Build a diagnostic pointing at the node that raised the error.
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        Diagnostic::error(self.kind(), span, self.to_string())
            .with_code(self.code())
            .with_label(Label::new(span, self.code().description()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_diagnostic::Severity;

    #[test]
    fn test_messages() {
        let err = EvalError::UnsupportedAssignment { name: "this".into() };
        assert_eq!(err.to_string(), "cannot assign to reserved reference `#this`");

        let err = EvalError::ClassCast {
            expected: Descriptor::String,
            found: "int".into(),
        };
        assert_eq!(err.to_string(), "cannot cast value of type `int` to `string`");
    }

    #[test]
    fn test_namespace_failure_is_passed_through_verbatim() {
        let err = EvalError::Namespace("backend offline".into());
        assert_eq!(err.to_string(), "backend offline");
        assert_eq!(err.code(), ErrorCode::NamespaceFailure);
    }

    #[test]
    fn test_to_diagnostic() {
        let span = Span::from_usize(0, 5);
        let diag = EvalError::NotCompilable { node: "#name".into() }.to_diagnostic(span);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.kind, DiagnosticKind::Compile);
        assert_eq!(diag.code, Some(ErrorCode::NotCompilable));
        assert_eq!(diag.labels[0].span, span);
        assert!(diag.help.is_some());
    }
}
