//! Type descriptors used by the compiled tier.

use std::fmt;
use std::sync::Arc;

use crate::{Value, Visibility};

/// A host object type as named by compiled code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectType {
    pub name: Arc<str>,
    pub visibility: Visibility,
}

/// The static type a compiled fragment leaves on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// The universal "any object" type. Casting to it is the identity.
    Any,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Object(ObjectType),
}

impl Descriptor {
    /// The descriptor of a value's concrete runtime type, without any
    /// accessibility check.
    pub fn of(value: &Value) -> Descriptor {
        match value {
            Value::Bool(_) => Descriptor::Bool,
            Value::Int(_) => Descriptor::Int,
            Value::Float(_) => Descriptor::Float,
            Value::String(_) => Descriptor::String,
            Value::List(_) => Descriptor::List,
            Value::Map(_) => Descriptor::Map,
            Value::Object(obj) => Descriptor::Object(ObjectType {
                name: Arc::from(obj.type_name()),
                visibility: obj.visibility(),
            }),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Descriptor::Any)
    }

    /// Whether compiled code may name this type.
    pub fn is_accessible(&self) -> bool {
        match self {
            Descriptor::Object(ty) => ty.visibility == Visibility::Public,
            _ => true,
        }
    }

    /// Whether a value of this concrete type passes a checked cast to `self`.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Descriptor::Any, _) => true,
            (Descriptor::Bool, Value::Bool(_))
            | (Descriptor::Int, Value::Int(_))
            | (Descriptor::Float, Value::Float(_))
            | (Descriptor::String, Value::String(_))
            | (Descriptor::List, Value::List(_))
            | (Descriptor::Map, Value::Map(_)) => true,
            (Descriptor::Object(ty), Value::Object(obj)) => *ty.name == *obj.type_name(),
            _ => false,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Any => f.write_str("any"),
            Descriptor::Bool => f.write_str("bool"),
            Descriptor::Int => f.write_str("int"),
            Descriptor::Float => f.write_str("float"),
            Descriptor::String => f.write_str("string"),
            Descriptor::List => f.write_str("list"),
            Descriptor::Map => f.write_str("map"),
            Descriptor::Object(ty) => write!(f, "object:{}", ty.name),
        }
    }
}
