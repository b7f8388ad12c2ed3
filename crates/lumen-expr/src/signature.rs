//! Exit signatures: the type a node promises the compiled tier.

use std::sync::{PoisonError, RwLock};

use crate::{Descriptor, Value};

/// Infer the exit descriptor for an observed value.
///
/// Absent values and values of non-public types map to [`Descriptor::Any`]:
/// a cast to a type generated code cannot name faults at run time, while a
/// cast to `Any` always succeeds.
pub fn exit_descriptor_for(value: Option<&Value>) -> Descriptor {
    match value {
        Some(value) if value.runtime_type().is_public() => Descriptor::of(value),
        _ => Descriptor::Any,
    }
}

/// A node's exit signature: unset until an interpreted evaluation records
/// one, then replaced on every later recording.
///
/// Concurrent evaluations may race to record; any writer's descriptor is
/// valid for the type it observed, so the last write wins. The cell is never
/// cleared by the node. If one node observes different types over time the
/// signature follows the latest, and compiled code built from an earlier
/// signature must be discarded by its owner.
#[derive(Debug, Default)]
pub struct ExitSignature {
    descriptor: RwLock<Option<Descriptor>>,
}

impl ExitSignature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Descriptor> {
        self.descriptor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.descriptor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Record the signature for an observed value and return it.
    pub fn record(&self, value: Option<&Value>) -> Descriptor {
        let descriptor = exit_descriptor_for(value);
        let previous = self
            .descriptor
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(descriptor.clone());

        match previous {
            Some(previous) if previous != descriptor => {
                tracing::debug!(%previous, current = %descriptor, "exit signature changed");
            }
            None => {
                tracing::debug!(%descriptor, "exit signature recorded");
            }
            _ => {}
        }
        if descriptor.is_any() {
            if let Some(value) = value {
                tracing::trace!(runtime_type = %value.runtime_type(), "non-public type degraded to any");
            }
        }
        descriptor
    }
}
