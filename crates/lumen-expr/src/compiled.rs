//! The compiled tier: assembled instruction sequences and their execution.

use std::sync::Arc;

use crate::{
    CodeFlow, Descriptor, EngineConfig, EvalError, EvalResult, ExpressionState, Instruction,
    Namespace, Node, TypedValue, UnboundPolicy, Value,
};

/// A compiled expression.
///
/// The program replays the exit type its node had when it was compiled. If
/// the node later observes a different type the program is stale, and
/// running it may fail with [`EvalError::ClassCast`]; rebuilding it is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct Program {
    source: String,
    instructions: Vec<Instruction>,
    exit: Descriptor,
    config: EngineConfig,
}

/// The locals a compiled program runs against. Unlike [`ExpressionState`]
/// there are no nested scopes: the context slot holds the root object.
pub struct Frame<'a> {
    context: TypedValue,
    namespace: &'a dyn Namespace,
}

impl<'a> Frame<'a> {
    pub fn new(context: TypedValue, namespace: &'a dyn Namespace) -> Self {
        Self { context, namespace }
    }

    /// Build a frame from the root object and namespace of a state.
    pub fn from_state(state: &ExpressionState<'a>) -> Self {
        Self::new(state.root_context(), state.namespace())
    }
}

enum Operand<'a> {
    Value(Option<Value>),
    Namespace(&'a dyn Namespace),
    Name(Arc<str>),
}

impl Program {
    /// Compile a node that has been evaluated at least once.
    pub fn compile(node: &dyn Node, config: &EngineConfig) -> EvalResult<Program> {
        check_slots(config)?;
        if !node.is_compilable() {
            return Err(EvalError::NotCompilable {
                node: node.to_string(),
            });
        }

        let mut instructions = Vec::new();
        let mut flow = CodeFlow::new(config);
        node.generate_code(&mut instructions, &mut flow)?;

        let exit = flow.pop_descriptor().ok_or(EvalError::StackImbalance { depth: 0 })?;
        if flow.depth() != 0 {
            return Err(EvalError::StackImbalance {
                depth: flow.depth() + 1,
            });
        }

        tracing::debug!(
            node = %node,
            exit = %exit,
            instructions = instructions.len(),
            "compiled expression"
        );
        Ok(Program {
            source: node.to_ast_string(),
            instructions,
            exit,
            config: config.clone(),
        })
    }

    /// Assemble a program from raw instructions.
    pub fn from_parts(
        source: impl Into<String>,
        instructions: Vec<Instruction>,
        exit: Descriptor,
        config: EngineConfig,
    ) -> Self {
        Self {
            source: source.into(),
            instructions,
            exit,
            config,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn exit_descriptor(&self) -> &Descriptor {
        &self.exit
    }

    /// Run the program, leaving its single result typed with the exit
    /// descriptor.
    pub fn run(&self, frame: &Frame<'_>) -> EvalResult<TypedValue> {
        check_slots(&self.config)?;
        let mut stack: Vec<Operand<'_>> = Vec::with_capacity(4);

        for instruction in &self.instructions {
            tracing::trace!(%instruction, depth = stack.len(), "execute");
            match instruction {
                Instruction::LoadLocal(slot) if *slot == self.config.context_slot => {
                    stack.push(Operand::Value(frame.context.value().cloned()));
                }
                Instruction::LoadLocal(slot) if *slot == self.config.namespace_slot => {
                    stack.push(Operand::Namespace(frame.namespace));
                }
                Instruction::LoadLocal(slot) => return Err(EvalError::InvalidSlot { slot: *slot }),
                Instruction::PushString(s) => stack.push(Operand::Name(Arc::clone(s))),
                Instruction::LookupVariable => {
                    let Some(Operand::Name(name)) = stack.pop() else {
                        return Err(EvalError::StackUnderflow);
                    };
                    let Some(Operand::Namespace(namespace)) = stack.pop() else {
                        return Err(EvalError::StackUnderflow);
                    };
                    let value = match namespace.lookup(&name)? {
                        Some(value) => value.into_value(),
                        None if self.config.unbound == UnboundPolicy::Strict => {
                            return Err(EvalError::UnboundVariable {
                                name: name.to_string(),
                            });
                        }
                        None => None,
                    };
                    stack.push(Operand::Value(value));
                }
                Instruction::CheckCast(target) => {
                    let Some(Operand::Value(value)) = stack.last() else {
                        return Err(EvalError::StackUnderflow);
                    };
                    check_cast(target, value.as_ref())?;
                }
            }
        }

        match stack.as_slice() {
            [Operand::Value(value)] => Ok(TypedValue::with_declared(value.clone(), self.exit.clone())),
            _ => Err(EvalError::StackImbalance { depth: stack.len() }),
        }
    }
}

/// The fields of a config are public, so the slot layout is checked again
/// wherever a frame layout is fixed.
fn check_slots(config: &EngineConfig) -> EvalResult<()> {
    if config.context_slot == config.namespace_slot {
        return Err(EvalError::SlotConflict {
            slot: config.context_slot,
        });
    }
    Ok(())
}

fn check_cast(target: &Descriptor, value: Option<&Value>) -> EvalResult<()> {
    if let Descriptor::Object(ty) = target {
        if !target.is_accessible() {
            return Err(EvalError::IllegalAccess {
                type_name: ty.name.to_string(),
            });
        }
    }
    match value {
        // Null passes any cast.
        None => Ok(()),
        Some(value) if target.accepts(value) => Ok(()),
        Some(value) => Err(EvalError::ClassCast {
            expected: target.clone(),
            found: value.runtime_type().to_string(),
        }),
    }
}
