//! # Application State
//!
//! Configuration and the registry built from it.
//! Everything is loaded once at startup.

use anyhow::Context;
use cart_core::{Currency, LineItemFactoryRegistry, ProductCatalog, RegistryConfig, SalesContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Registry TOML (handler order, collision policy)
    pub registry_config_path: PathBuf,
    /// Product catalog TOML; optional on disk
    pub catalog_path: PathBuf,
    pub channel_id: String,
    pub currency: Currency,
    pub locale: String,
}

impl AppConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let currency_code = var("CART_CURRENCY").unwrap_or_else(|| "usd".to_string());
        let currency = Currency::parse(&currency_code)
            .with_context(|| format!("Unsupported CART_CURRENCY: {currency_code}"))?;

        Ok(Self {
            registry_config_path: var("LINE_ITEM_CONFIG")
                .unwrap_or_else(|| "config/line_items.toml".to_string())
                .into(),
            catalog_path: var("PRODUCT_CATALOG")
                .unwrap_or_else(|| "config/products.toml".to_string())
                .into(),
            channel_id: var("SALES_CHANNEL").unwrap_or_else(|| "default".to_string()),
            currency,
            locale: var("CART_LOCALE").unwrap_or_else(|| "en-US".to_string()),
        })
    }

    /// Context handed to every handler call
    pub fn sales_context(&self) -> SalesContext {
        SalesContext::new(&self.channel_id, self.currency).with_locale(&self.locale)
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<LineItemFactoryRegistry>,
    pub context: SalesContext,
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment
    pub fn new() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env()?)
    }

    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let registry_config = load_registry_config(&config.registry_config_path)?;
        let catalog = load_product_catalog(&config.catalog_path)?.map(Arc::new);
        let registry = LineItemFactoryRegistry::from_config(&registry_config, catalog);

        Ok(Self {
            registry: Arc::new(registry),
            context: config.sales_context(),
            config,
        })
    }
}

/// Registry config from file, or the defaults when the file is absent
fn load_registry_config(path: &Path) -> anyhow::Result<RegistryConfig> {
    if !path.exists() {
        tracing::warn!("No registry config at {}, using defaults", path.display());
        return Ok(RegistryConfig::default());
    }

    let config = RegistryConfig::from_path(path)?;
    tracing::info!("Loaded registry config from {}", path.display());
    Ok(config)
}

/// Product catalog from file; without one, product references are not checked
fn load_product_catalog(path: &Path) -> anyhow::Result<Option<ProductCatalog>> {
    if !path.exists() {
        tracing::warn!("No product catalog at {}, product references are unchecked", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let catalog = ProductCatalog::from_toml(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} products from {}", catalog.products.len(), path.display());
    Ok(Some(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_vars(vars(&[])).unwrap();

        assert_eq!(config.registry_config_path, PathBuf::from("config/line_items.toml"));
        assert_eq!(config.catalog_path, PathBuf::from("config/products.toml"));
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.sales_context(), SalesContext::default());
    }

    #[test]
    fn test_app_config_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("CART_CURRENCY", "EUR"),
            ("SALES_CHANNEL", "pos"),
            ("CART_LOCALE", "de-DE"),
        ]))
        .unwrap();

        let ctx = config.sales_context();
        assert_eq!(ctx.currency, Currency::EUR);
        assert_eq!(ctx.channel_id, "pos");
        assert_eq!(ctx.locale, "de-DE");
    }

    #[test]
    fn test_app_config_rejects_unknown_currency() {
        assert!(AppConfig::from_vars(vars(&[("CART_CURRENCY", "doge")])).is_err());
    }

    #[test]
    fn test_state_falls_back_to_defaults() {
        let config = AppConfig {
            registry_config_path: "missing/line_items.toml".into(),
            catalog_path: "missing/products.toml".into(),
            ..AppConfig::from_vars(vars(&[])).unwrap()
        };

        let state = AppState::from_config(config).unwrap();

        assert_eq!(
            state.registry.handler_names(),
            vec!["product", "promotion", "credit", "custom"]
        );
    }

    #[test]
    fn test_state_fails_on_unreadable_catalog() {
        let config = AppConfig {
            registry_config_path: "missing/line_items.toml".into(),
            catalog_path: std::env::temp_dir(),
            ..AppConfig::from_vars(vars(&[])).unwrap()
        };

        let err = AppState::from_config(config).unwrap_err();

        assert!(err.to_string().starts_with("Failed to read"));
    }
}
