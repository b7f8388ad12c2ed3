//! Error codes for Lumen diagnostics.

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Reference syntax errors (E0001 - E0099)
    UnexpectedCharacter,
    MissingReferenceMarker,
    EmptyIdentifier,
    TrailingInput,

    // Evaluation errors (E0300 - E0399)
    UnsupportedAssignment,
    NotAssignable,
    UnboundVariable,
    ReadOnlyNamespace,
    NamespaceFailure,

    // Compiled tier errors (E0400 - E0499)
    NotCompilable,
    IllegalAccess,
    ClassCast,
    StackImbalance,
    InvalidSlot,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "E0001",
            ErrorCode::MissingReferenceMarker => "E0002",
            ErrorCode::EmptyIdentifier => "E0003",
            ErrorCode::TrailingInput => "E0004",

            ErrorCode::UnsupportedAssignment => "E0300",
            ErrorCode::NotAssignable => "E0301",
            ErrorCode::UnboundVariable => "E0302",
            ErrorCode::ReadOnlyNamespace => "E0303",
            ErrorCode::NamespaceFailure => "E0304",

            ErrorCode::NotCompilable => "E0400",
            ErrorCode::IllegalAccess => "E0401",
            ErrorCode::ClassCast => "E0402",
            ErrorCode::StackImbalance => "E0403",
            ErrorCode::InvalidSlot => "E0404",
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "unexpected character in variable reference",
            ErrorCode::MissingReferenceMarker => "variable reference must start with `#`",
            ErrorCode::EmptyIdentifier => "variable reference has no name",
            ErrorCode::TrailingInput => "unexpected input after variable reference",

            ErrorCode::UnsupportedAssignment => "cannot assign to a reserved context reference",
            ErrorCode::NotAssignable => "reference is not assignable",
            ErrorCode::UnboundVariable => "variable is not bound in the namespace",
            ErrorCode::ReadOnlyNamespace => "namespace does not accept writes",
            ErrorCode::NamespaceFailure => "namespace operation failed",

            ErrorCode::NotCompilable => "expression has no exit signature yet",
            ErrorCode::IllegalAccess => "compiled code referenced a non-public type",
            ErrorCode::ClassCast => "value does not match the compiled exit type",
            ErrorCode::StackImbalance => "compiled program left the stack unbalanced",
            ErrorCode::InvalidSlot => "compiled program loaded an unknown local slot",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::MissingReferenceMarker => Some("write the reference as `#name`"),
            ErrorCode::UnsupportedAssignment => {
                Some("`#this` and `#root` are read-only; assign to a named variable instead")
            }
            ErrorCode::UnboundVariable => {
                Some("define the variable first, or evaluate with the lenient unbound policy")
            }
            ErrorCode::NotCompilable => {
                Some("evaluate the expression in interpreted mode at least once before compiling")
            }
            ErrorCode::ClassCast => {
                Some("the binding changed type since compilation; discard the compiled unit")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped_by_range() {
        assert!(ErrorCode::EmptyIdentifier.as_str().starts_with("E00"));
        assert!(ErrorCode::UnsupportedAssignment.as_str().starts_with("E03"));
        assert!(ErrorCode::ClassCast.as_str().starts_with("E04"));
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(ErrorCode::NotCompilable.to_string(), "E0400");
    }
}
