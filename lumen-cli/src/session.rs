//! Evaluation sessions built from command line options.

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lumen_expr::{
    EngineConfig, ExpressionState, HostObject, StandardNamespace, TypedValue, Value, Visibility,
};

/// Where a session takes its bindings and settings from.
#[derive(Debug, Default, Clone)]
pub struct SessionOptions {
    /// JSON file holding an object of variable bindings.
    pub vars: Option<PathBuf>,
    /// JSON text of the root context object.
    pub root: Option<String>,
    /// JSON file holding an engine config.
    pub config: Option<PathBuf>,
    /// Reject assignments.
    pub read_only: bool,
}

/// A host object described in a bindings file as
/// `{ "$type": "Name", "$public": false, ... }`.
#[derive(Debug)]
pub struct OpaqueObject {
    type_name: String,
    visibility: Visibility,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl HostObject for OpaqueObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The namespace, root object and config an expression is evaluated with.
pub struct Session {
    pub namespace: StandardNamespace,
    pub root: TypedValue,
    pub config: EngineConfig,
}

impl Session {
    pub fn load(options: &SessionOptions) -> Result<Self, String> {
        let config = match &options.config {
            Some(path) => {
                let text = read(path)?;
                EngineConfig::from_json(&text).map_err(|e| e.to_string())?
            }
            None => EngineConfig::default(),
        };

        let bindings = match &options.vars {
            Some(path) => load_bindings(path)?,
            None => HashMap::new(),
        };
        let namespace = if options.read_only {
            StandardNamespace::read_only(bindings)
        } else {
            StandardNamespace::from(bindings)
        };

        let root = match &options.root {
            Some(text) => parse_json_value(text)?,
            None => TypedValue::NULL,
        };

        tracing::debug!(
            variables = namespace.names().len(),
            read_only = options.read_only,
            "session loaded"
        );
        Ok(Self {
            namespace,
            root,
            config,
        })
    }

    pub fn state(&self) -> ExpressionState<'_> {
        ExpressionState::new(self.root.clone(), &self.namespace).with_config(self.config.clone())
    }
}

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))
}

/// Load variable bindings from a JSON object file.
pub fn load_bindings(path: &Path) -> Result<HashMap<String, TypedValue>, String> {
    let text = read(path)?;
    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))?;
    let serde_json::Value::Object(fields) = json else {
        return Err(format!("{}: bindings must be a JSON object", path.display()));
    };

    let mut bindings = HashMap::new();
    for (name, value) in fields {
        let value = binding_value(&value).map_err(|e| format!("{}: `{}`: {}", path.display(), name, e))?;
        bindings.insert(name, value);
    }
    Ok(bindings)
}

/// Parse JSON text into a typed value.
pub fn parse_json_value(text: &str) -> Result<TypedValue, String> {
    let json: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    binding_value(&json)
}

fn binding_value(json: &serde_json::Value) -> Result<TypedValue, String> {
    if let serde_json::Value::Object(fields) = json {
        if let Some(type_name) = fields.get("$type") {
            let type_name = type_name
                .as_str()
                .ok_or_else(|| "`$type` must be a string".to_string())?;
            let public = fields.get("$public").and_then(|v| v.as_bool()).unwrap_or(true);
            let mut fields = fields.clone();
            fields.remove("$type");
            fields.remove("$public");
            return Ok(TypedValue::new(Value::object(OpaqueObject {
                type_name: type_name.to_string(),
                visibility: if public {
                    Visibility::Public
                } else {
                    Visibility::Restricted
                },
                fields,
            })));
        }
    }
    Value::from_json(json).map(TypedValue::from_option)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_expr::{Namespace, UnboundPolicy};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_bindings() {
        let file = json_file(r#"{ "name": "Alice", "age": 30, "nothing": null }"#);
        let bindings = load_bindings(file.path()).unwrap();
        assert_eq!(bindings["name"], TypedValue::new(Value::from("Alice")));
        assert_eq!(bindings["age"], TypedValue::new(Value::Int(30)));
        assert!(bindings["nothing"].is_null());
    }

    #[test]
    fn test_load_bindings_requires_object() {
        let file = json_file("[1, 2]");
        assert!(load_bindings(file.path()).unwrap_err().contains("JSON object"));
    }

    #[test]
    fn test_opaque_objects() {
        let value = parse_json_value(r#"{ "$type": "SessionImpl", "$public": false, "id": 7 }"#).unwrap();
        let obj = value.value().unwrap();
        assert_eq!(obj.runtime_type().name, "SessionImpl");
        assert!(!obj.runtime_type().is_public());
        let opaque = obj.downcast_ref::<OpaqueObject>().unwrap();
        assert_eq!(opaque.fields.len(), 1);
    }

    #[test]
    fn test_session_load() {
        let vars = json_file(r#"{ "x": 1 }"#);
        let config = json_file(r#"{ "unbound": "strict" }"#);
        let session = Session::load(&SessionOptions {
            vars: Some(vars.path().to_path_buf()),
            root: Some(r#""ctx""#.to_string()),
            config: Some(config.path().to_path_buf()),
            read_only: true,
        })
        .unwrap();

        assert_eq!(session.config.unbound, UnboundPolicy::Strict);
        assert_eq!(session.root, TypedValue::new(Value::from("ctx")));
        assert!(session.namespace.is_read_only());
        assert!(session.namespace.set("x", None).is_err());
        assert_eq!(session.state().lookup_variable("x").unwrap(), TypedValue::new(Value::Int(1)));
    }
}
