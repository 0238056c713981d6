//! # Sales Context
//!
//! Caller-supplied environment passed through the registry to handlers.
//! The registry never inspects it.

use crate::product::Currency;
use serde::{Deserialize, Serialize};

/// Sales channel, currency and locale for the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesContext {
    /// Sales channel identifier (e.g., "storefront", "pos")
    pub channel_id: String,

    pub currency: Currency,

    /// BCP 47 locale tag (e.g., "en-US")
    pub locale: String,
}

impl SalesContext {
    pub fn new(channel_id: impl Into<String>, currency: Currency) -> Self {
        Self {
            channel_id: channel_id.into(),
            currency,
            locale: "en-US".to_string(),
        }
    }

    /// Builder: set locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

impl Default for SalesContext {
    fn default() -> Self {
        Self::new("default", Currency::USD)
    }
}
