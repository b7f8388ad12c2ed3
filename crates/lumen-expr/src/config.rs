//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a lookup of a name with no binding is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnboundPolicy {
    /// An unbound name reads as null, indistinguishable from a name bound
    /// to null.
    #[default]
    Lenient,
    /// An unbound name fails with `EvalError::UnboundVariable`.
    Strict,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EngineConfig {
    /// Treatment of unbound variable names.
    pub unbound: UnboundPolicy,
    /// Local slot holding the active context object in compiled code.
    pub context_slot: u16,
    /// Local slot holding the namespace handle in compiled code.
    pub namespace_slot: u16,
}

/// Errors loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("context and namespace both use local slot {0}")]
    SlotConflict(u16),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unbound: UnboundPolicy::Lenient,
            context_slot: 1,
            namespace_slot: 2,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unbound-variable policy.
    pub fn unbound(mut self, policy: UnboundPolicy) -> Self {
        self.unbound = policy;
        self
    }

    /// Set the local slots compiled code loads from. The two must differ.
    pub fn slots(mut self, context_slot: u16, namespace_slot: u16) -> Result<Self, ConfigError> {
        self.context_slot = context_slot;
        self.namespace_slot = namespace_slot;
        self.validate()?;
        Ok(self)
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.context_slot == self.namespace_slot {
            return Err(ConfigError::SlotConflict(self.context_slot));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.unbound, UnboundPolicy::Lenient);
        assert_eq!(config.context_slot, 1);
        assert_eq!(config.namespace_slot, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .unbound(UnboundPolicy::Strict)
            .slots(3, 4)
            .unwrap();
        assert_eq!(config.unbound, UnboundPolicy::Strict);
        assert_eq!((config.context_slot, config.namespace_slot), (3, 4));
    }

    #[test]
    fn test_builder_rejects_shared_slot() {
        let err = EngineConfig::new().slots(1, 1).unwrap_err();
        assert!(matches!(err, ConfigError::SlotConflict(1)));
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{ "unbound": "strict" }"#).unwrap();
        assert_eq!(config.unbound, UnboundPolicy::Strict);
        assert_eq!(config.context_slot, 1);
    }

    #[test]
    fn test_from_json_rejects_slot_conflict() {
        let err = EngineConfig::from_json(r#"{ "context-slot": 2 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::SlotConflict(2)));
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "slot": 1 }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
