//! # Catalog Types
//!
//! Money and product catalog types referenced by line items.
//! Products are loaded from `config/products.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }

    /// Parse a case-insensitive ISO code
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "usd" => Some(Currency::USD),
            "eur" => Some(Currency::EUR),
            "gbp" => Some(Currency::GBP),
            "jpy" => Some(Currency::JPY),
            "cad" => Some(Currency::CAD),
            "aud" => Some(Currency::AUD),
            "chf" => Some(Currency::CHF),
            "mxn" => Some(Currency::MXN),
            _ => None,
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents, etc.).
    ///
    /// `None` for non-finite amounts or results outside the `i64` range.
    pub fn to_smallest_unit(&self, amount: f64) -> Option<i64> {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        let scaled = (amount * multiplier).round();

        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return None;
        }
        Some(scaled as i64)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for USD); negative for credits
    pub amount: i64,
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount; `None` if it does not fit
    pub fn new(amount: f64, currency: Currency) -> Option<Self> {
        Some(Self {
            amount: currency.to_smallest_unit(amount)?,
            currency,
        })
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "rang-play-rs-pro")
    pub id: String,

    /// Display name, used as the default line item label
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub price: Price,

    /// Whether this product is active and available for purchase
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            active: true,
            metadata: HashMap::new(),
        }
    }

    /// Builder: mark the product unavailable
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Builder: add a product
    pub fn with_product(mut self, product: Product) -> Self {
        self.add(product);
        self
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion() {
        assert_eq!(Currency::USD.to_smallest_unit(10.99), Some(1099));
        assert_eq!(Currency::JPY.to_smallest_unit(1000.0), Some(1000));
        assert_eq!(Price::new(-5.5, Currency::EUR).unwrap().amount, -550);
    }

    #[test]
    fn test_currency_conversion_out_of_range() {
        assert_eq!(Currency::USD.to_smallest_unit(1e300), None);
        assert_eq!(Currency::USD.to_smallest_unit(-1e300), None);
        assert_eq!(Currency::USD.to_smallest_unit(f64::INFINITY), None);
        assert_eq!(Currency::USD.to_smallest_unit(f64::NAN), None);
        assert!(Price::new(1e17, Currency::USD).is_none());
        assert_eq!(Currency::USD.to_smallest_unit(0.001), Some(0));
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::parse("EUR"), Some(Currency::EUR));
        assert_eq!(Currency::parse("usd"), Some(Currency::USD));
        assert_eq!(Currency::parse("btc"), None);
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = ProductCatalog::from_toml(
            r#"
            [[products]]
            id = "p1"
            name = "Widget"
            price = { amount = 1999, currency = "usd" }

            [[products]]
            id = "p2"
            name = "Retired"
            active = false
            price = { amount = 500, currency = "eur" }
            "#,
        )
        .unwrap();

        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.get("p1").unwrap().price.amount, 1999);
        assert!(catalog.get("p1").unwrap().active);
        assert!(!catalog.get("p2").unwrap().active);
        assert!(catalog.get("missing").is_none());
    }
}
