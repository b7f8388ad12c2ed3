//! Expression nodes for Lumen.
//!
//! Every node can be evaluated two ways: interpreted directly against an
//! [`ExpressionState`], or, once an interpreted pass has fixed its exit type,
//! compiled into [`Instruction`]s and replayed through a [`Program`].
//!
//! The variable reference (`#this`, `#root`, `#name`) is the node provided
//! here; it also defines the read/write [`ValueRef`] capability used by
//! assignment-style operators.

mod codegen;
mod compiled;
mod config;
mod descriptor;
mod error;
mod namespace;
mod node;
mod reference;
mod signature;
mod state;
mod syntax;
mod value;
mod variable;

pub use codegen::{CodeFlow, Instruction, MethodEmitter, insert_check_cast};
pub use compiled::{Frame, Program};
pub use config::{ConfigError, EngineConfig, UnboundPolicy};
pub use descriptor::{Descriptor, ObjectType};
pub use error::{EvalError, EvalResult};
pub use namespace::{Namespace, StandardNamespace, ValueProducer};
pub use node::Node;
pub use reference::ValueRef;
pub use signature::{ExitSignature, exit_descriptor_for};
pub use state::ExpressionState;
pub use syntax::{Scanner, Token, TokenKind, parse_reference};
pub use value::{HostObject, RuntimeType, TypedValue, Value, Visibility};
pub use variable::{Identifier, VariableName, VariableReference};
