//! # Line Item Types
//!
//! The cart entry produced by handlers, and the request mapping handlers
//! build it from.

use crate::error::{CartError, CartResult};
use crate::product::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Open key/value bag for handler-specific data
pub type Payload = Map<String, Value>;

/// One entry in a cart.
///
/// `id` and `type` are fixed at construction; there are no setters for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    id: String,

    #[serde(rename = "type")]
    item_type: String,

    /// External entity this item points at (product id, promotion id, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_id: Option<String>,

    quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub payload: Payload,

    /// Unit price, owned by the pricing engine once the cart is recalculated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    /// When false the quantity cannot change after creation
    pub stackable: bool,

    pub removable: bool,

    pub created_at: DateTime<Utc>,
}

impl LineItem {
    /// Create a stackable, removable line item.
    ///
    /// Fails when `id` or `item_type` is empty or `quantity` is zero.
    pub fn new(
        id: impl Into<String>,
        item_type: impl Into<String>,
        quantity: u32,
    ) -> CartResult<Self> {
        let id = id.into();
        let item_type = item_type.into();

        if id.trim().is_empty() {
            return Err(CartError::missing("id"));
        }
        if item_type.trim().is_empty() {
            return Err(CartError::missing("type"));
        }
        if quantity == 0 {
            return Err(CartError::validation("quantity", "must be at least 1"));
        }

        Ok(Self {
            id,
            item_type,
            referenced_id: None,
            quantity,
            label: None,
            payload: Payload::new(),
            price: None,
            stackable: true,
            removable: true,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Change the quantity, respecting the stackable flag
    pub fn set_quantity(&mut self, quantity: u32) -> CartResult<()> {
        if quantity == 0 {
            return Err(CartError::validation("quantity", "must be at least 1"));
        }
        if !self.stackable && quantity != self.quantity {
            return Err(CartError::NotStackable {
                id: self.id.clone(),
            });
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Shallow merge: keys in `payload` overwrite existing keys
    pub fn merge_payload(&mut self, payload: &Payload) {
        for (key, value) in payload {
            self.payload.insert(key.clone(), value.clone());
        }
    }

    /// Builder: set referenced entity id
    pub fn with_referenced_id(mut self, referenced_id: impl Into<String>) -> Self {
        self.referenced_id = Some(referenced_id.into());
        self
    }

    /// Builder: set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set unit price
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Builder: replace payload
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Builder: set stackable flag
    pub fn with_stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    /// Builder: set removable flag
    pub fn with_removable(mut self, removable: bool) -> Self {
        self.removable = removable;
        self
    }
}

/// Request mapping for creating or updating a line item.
///
/// Every field is optional: on create, handlers decide what is required;
/// on update, an absent field leaves the line item untouched. Keys no
/// field recognizes are collected in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_id: Option<String>,

    /// Signed so that malformed input reaches handler validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Decimal unit price in the context currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stackable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItemData {
    /// Create-request for the given type
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: Some(item_type.into()),
            ..Self::default()
        }
    }

    /// Parse from a JSON value (camelCase keys)
    pub fn from_json(value: Value) -> CartResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_referenced_id(mut self, referenced_id: impl Into<String>) -> Self {
        self.referenced_id = Some(referenced_id.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Builder: insert one payload key
    pub fn with_payload_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload
            .get_or_insert_with(Payload::new)
            .insert(key.into(), value.into());
        self
    }

    /// The `type` tag; empty or whitespace-only counts as missing
    pub fn require_type(&self) -> CartResult<&str> {
        non_empty(self.item_type.as_deref(), "type")
    }

    pub fn require_referenced_id(&self) -> CartResult<&str> {
        non_empty(self.referenced_id.as_deref(), "referencedId")
    }

    /// Referenced id if present; present-but-empty is malformed
    pub fn referenced_id(&self) -> CartResult<Option<&str>> {
        optional_non_empty(self.referenced_id.as_deref(), "referencedId")
    }

    /// Label if present; present-but-empty is malformed
    pub fn label(&self) -> CartResult<Option<&str>> {
        optional_non_empty(self.label.as_deref(), "label")
    }

    /// Quantity if present, checked to be in `1..=u32::MAX`
    pub fn quantity(&self) -> CartResult<Option<u32>> {
        match self.quantity {
            None => Ok(None),
            Some(q) if q < 1 => Err(CartError::validation("quantity", "must be at least 1")),
            Some(q) => u32::try_from(q)
                .map(Some)
                .map_err(|_| CartError::validation("quantity", "is too large")),
        }
    }

    /// Quantity, defaulting to 1
    pub fn quantity_or_default(&self) -> CartResult<u32> {
        Ok(self.quantity()?.unwrap_or(1))
    }

    /// Price if present, checked to be finite
    pub fn price(&self) -> CartResult<Option<f64>> {
        match self.price {
            Some(p) if !p.is_finite() => Err(CartError::validation("price", "must be a finite number")),
            other => Ok(other),
        }
    }

    /// Caller-supplied id, or `fallback` when absent
    pub fn id_or_else(&self, fallback: impl FnOnce() -> String) -> CartResult<String> {
        Ok(optional_non_empty(self.id.as_deref(), "id")?
            .map(str::to_string)
            .unwrap_or_else(fallback))
    }

    /// Caller-supplied id, or a freshly generated one
    pub fn id_or_generate(&self) -> CartResult<String> {
        self.id_or_else(generate_id)
    }

    /// Numeric payload entry; present-but-non-numeric is malformed
    pub fn payload_number(&self, key: &str) -> CartResult<Option<f64>> {
        match self.payload.as_ref().and_then(|p| p.get(key)) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or_else(|| {
                CartError::validation(format!("payload.{key}"), "must be a number")
            }),
        }
    }
}

/// New random line item id (32 hex chars)
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn non_empty<'a>(value: Option<&'a str>, field: &str) -> CartResult<&'a str> {
    optional_non_empty(value, field)?.ok_or_else(|| CartError::missing(field))
}

fn optional_non_empty<'a>(value: Option<&'a str>, field: &str) -> CartResult<Option<&'a str>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(CartError::validation(field, "must not be empty")),
        other => Ok(other),
    }
}
