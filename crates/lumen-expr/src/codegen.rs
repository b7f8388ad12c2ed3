//! The code emission bridge.
//!
//! Nodes drive a [`MethodEmitter`] to append instructions and record the
//! static type they leave on the stack in a [`CodeFlow`].

use std::fmt;
use std::sync::Arc;

use crate::{Descriptor, EngineConfig};

/// A compiled-tier instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Push the contents of a local slot.
    LoadLocal(u16),
    /// Push a string constant.
    PushString(Arc<str>),
    /// Pop a name and a namespace handle, push the variable's value.
    LookupVariable,
    /// Checked narrowing of the top of the stack.
    CheckCast(Descriptor),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::LoadLocal(slot) => write!(f, "load_local {}", slot),
            Instruction::PushString(s) => write!(f, "push_string {:?}", s),
            Instruction::LookupVariable => f.write_str("lookup_variable"),
            Instruction::CheckCast(d) => write!(f, "check_cast {}", d),
        }
    }
}

/// A sink for emitted instructions.
pub trait MethodEmitter {
    fn emit(&mut self, instruction: Instruction);
}

impl MethodEmitter for Vec<Instruction> {
    fn emit(&mut self, instruction: Instruction) {
        self.push(instruction);
    }
}

/// Compile-time bookkeeping shared by the nodes of one compiled unit: the
/// frame layout and a stack of the descriptors each fragment produced.
#[derive(Debug, Clone)]
pub struct CodeFlow {
    context_slot: u16,
    namespace_slot: u16,
    descriptors: Vec<Descriptor>,
}

impl CodeFlow {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            context_slot: config.context_slot,
            namespace_slot: config.namespace_slot,
            descriptors: Vec::new(),
        }
    }

    pub fn context_slot(&self) -> u16 {
        self.context_slot
    }

    pub fn namespace_slot(&self) -> u16 {
        self.namespace_slot
    }

    /// Register the static type of the value a fragment just left on the stack.
    pub fn push_descriptor(&mut self, descriptor: Descriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn pop_descriptor(&mut self) -> Option<Descriptor> {
        self.descriptors.pop()
    }

    pub fn last_descriptor(&self) -> Option<&Descriptor> {
        self.descriptors.last()
    }

    pub fn depth(&self) -> usize {
        self.descriptors.len()
    }
}

/// Emit a checked cast to `descriptor`. Narrowing to [`Descriptor::Any`] is
/// the identity and emits nothing.
pub fn insert_check_cast(emitter: &mut dyn MethodEmitter, descriptor: &Descriptor) {
    if !descriptor.is_any() {
        emitter.emit(Instruction::CheckCast(descriptor.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cast_skips_any() {
        let mut code = Vec::new();
        insert_check_cast(&mut code, &Descriptor::Any);
        assert!(code.is_empty());

        insert_check_cast(&mut code, &Descriptor::String);
        assert_eq!(code, vec![Instruction::CheckCast(Descriptor::String)]);
    }

    #[test]
    fn test_code_flow_descriptor_stack() {
        let mut flow = CodeFlow::new(&EngineConfig::default());
        assert_eq!(flow.context_slot(), 1);
        assert_eq!(flow.namespace_slot(), 2);

        flow.push_descriptor(Descriptor::Int);
        flow.push_descriptor(Descriptor::String);
        assert_eq!(flow.depth(), 2);
        assert_eq!(flow.last_descriptor(), Some(&Descriptor::String));
        assert_eq!(flow.pop_descriptor(), Some(Descriptor::String));
        assert_eq!(flow.depth(), 1);
    }

    #[test]
    fn test_instruction_display() {
        assert_eq!(Instruction::LoadLocal(2).to_string(), "load_local 2");
        assert_eq!(Instruction::PushString("name".into()).to_string(), "push_string \"name\"");
        assert_eq!(Instruction::CheckCast(Descriptor::Int).to_string(), "check_cast int");
    }
}
