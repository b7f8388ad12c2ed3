//! Runtime values.

use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::Descriptor;

/// Whether generated code may name a type directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    /// Visible to the host only. Compiled code must not cast to it.
    Restricted,
}

/// An object supplied by the embedding application.
///
/// The engine never inspects host objects beyond their type name and
/// visibility; property access on them belongs to other nodes.
pub trait HostObject: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    fn visibility(&self) -> Visibility {
        Visibility::Public
    }

    fn as_any(&self) -> &dyn Any;
}

/// The concrete type of a runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeType {
    pub name: Cow<'static, str>,
    pub visibility: Visibility,
}

impl RuntimeType {
    const fn builtin(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            visibility: Visibility::Public,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A runtime value.
///
/// There is no null variant: absence is expressed by [`TypedValue`] holding
/// no value.
#[derive(Clone)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(Arc<str>),
    /// List value
    List(Arc<Vec<Value>>),
    /// Map value, keyed by string
    Map(Arc<BTreeMap<String, Value>>),
    /// Host object
    Object(Arc<dyn HostObject>),
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn object<T: HostObject + 'static>(obj: T) -> Self {
        Value::Object(Arc::new(obj))
    }

    pub fn runtime_type(&self) -> RuntimeType {
        match self {
            Value::Bool(_) => RuntimeType::builtin("bool"),
            Value::Int(_) => RuntimeType::builtin("int"),
            Value::Float(_) => RuntimeType::builtin("float"),
            Value::String(_) => RuntimeType::builtin("string"),
            Value::List(_) => RuntimeType::builtin("list"),
            Value::Map(_) => RuntimeType::builtin("map"),
            Value::Object(obj) => RuntimeType {
                name: Cow::Owned(obj.type_name().to_string()),
                visibility: obj.visibility(),
            },
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Downcast a host object to its concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Convert a JSON value. `null` maps to `None`; nulls nested inside
    /// arrays or objects are rejected since collections cannot hold them.
    pub fn from_json(json: &serde_json::Value) -> Result<Option<Value>, String> {
        use serde_json::Value as Json;

        fn required(json: &Json) -> Result<Value, String> {
            Value::from_json(json)?.ok_or_else(|| "null is not allowed inside a collection".to_string())
        }

        let value = match json {
            Json::Null => return Ok(None),
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().ok_or_else(|| format!("number out of range: {n}"))?),
            },
            Json::String(s) => Value::string(s.as_str()),
            Json::Array(items) => {
                let values: Result<Vec<_>, _> = items.iter().map(required).collect();
                Value::List(Arc::new(values?))
            }
            Json::Object(fields) => {
                let mut map = BTreeMap::new();
                for (key, value) in fields {
                    map.insert(key.clone(), required(value)?);
                }
                Value::Map(Arc::new(map))
            }
        };
        Ok(Some(value))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Object(obj) => write!(f, "<{}>", obj.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Host objects compare by identity
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

/// The result of any evaluation: a value, possibly absent, and the type the
/// producer declared for it.
///
/// The declared type is informational for the interpreted tier; the compiled
/// tier derives its own exit type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    value: Option<Value>,
    declared: Option<Descriptor>,
}

impl TypedValue {
    pub const NULL: TypedValue = TypedValue {
        value: None,
        declared: None,
    };

    /// Wrap a value, declaring its own concrete type.
    pub fn new(value: Value) -> Self {
        let declared = Some(Descriptor::of(&value));
        Self {
            value: Some(value),
            declared,
        }
    }

    pub fn with_declared(value: Option<Value>, declared: Descriptor) -> Self {
        Self {
            value,
            declared: Some(declared),
        }
    }

    pub fn from_option(value: Option<Value>) -> Self {
        value.map_or(Self::NULL, Self::new)
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    pub fn declared_type(&self) -> Option<&Descriptor> {
        self.declared.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

impl From<Value> for TypedValue {
    fn from(value: Value) -> Self {
        TypedValue::new(value)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{:?}", v),
            None => f.write_str("null"),
        }
    }
}
