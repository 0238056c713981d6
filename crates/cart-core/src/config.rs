//! # Registry Configuration
//!
//! Which built-in handlers to register, in which order, and how to treat
//! type collisions. Loaded from `config/line_items.toml`:
//!
//! ```toml
//! handlers = ["product", "promotion", "credit", "custom"]
//! collision_policy = "first_match"
//! ```

use crate::error::{CartError, CartResult};
use crate::registry::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Built-in handler selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Product,
    Promotion,
    Credit,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Handlers in registration order
    #[serde(default = "default_handlers")]
    pub handlers: Vec<HandlerKind>,

    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

fn default_handlers() -> Vec<HandlerKind> {
    vec![
        HandlerKind::Product,
        HandlerKind::Promotion,
        HandlerKind::Credit,
        HandlerKind::Custom,
    ]
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            handlers: default_handlers(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Parse from a TOML string
    pub fn from_toml(toml_str: &str) -> CartResult<Self> {
        toml::from_str(toml_str).map_err(|e| CartError::Configuration(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> CartResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::from_toml("").unwrap();

        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.handlers.len(), 4);
        assert_eq!(config.collision_policy, CollisionPolicy::FirstMatch);
    }

    #[test]
    fn test_parse_order_and_policy() {
        let config = RegistryConfig::from_toml(
            r#"
            handlers = ["custom", "product"]
            collision_policy = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.handlers, vec![HandlerKind::Custom, HandlerKind::Product]);
        assert_eq!(config.collision_policy, CollisionPolicy::Reject);
    }

    #[test]
    fn test_unknown_handler_is_configuration_error() {
        let err = RegistryConfig::from_toml(r#"handlers = ["gift_card"]"#).unwrap_err();
        assert!(matches!(err, CartError::Configuration(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RegistryConfig::from_path("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, CartError::Configuration(_)));
    }
}
