//! # Cart
//!
//! Owns line items once they are created. Ids are unique within a cart.

use crate::context::SalesContext;
use crate::error::{CartError, CartResult};
use crate::line_item::{LineItem, LineItemData};
use crate::registry::LineItemFactoryRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique cart token (generated)
    pub token: String,

    line_items: Vec<LineItem>,

    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart with a generated token
    pub fn new() -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            line_items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a line item.
    ///
    /// An existing stackable item with the same id and payload absorbs the
    /// quantity and keeps its own label and price. Any other duplicate is
    /// rejected and the cart is left as it was.
    pub fn add(&mut self, item: LineItem) -> CartResult<()> {
        let Some(index) = self.line_items.iter().position(|i| i.id() == item.id()) else {
            debug!(id = item.id(), item_type = item.item_type(), "Added line item");
            self.line_items.push(item);
            return Ok(());
        };
        let existing = &mut self.line_items[index];

        if existing.item_type() != item.item_type() {
            return Err(CartError::validation(
                "id",
                format!("already used by a '{}' line item", existing.item_type()),
            ));
        }
        if !existing.stackable {
            return Err(CartError::NotStackable {
                id: existing.id().to_string(),
            });
        }

        if existing.payload != item.payload {
            return Err(CartError::validation(
                "payload",
                "differs from the line item it would stack onto",
            ));
        }

        let quantity = existing
            .quantity()
            .checked_add(item.quantity())
            .ok_or_else(|| CartError::validation("quantity", "is too large"))?;
        existing.set_quantity(quantity)?;
        debug!(id = existing.id(), quantity, "Stacked line item");
        Ok(())
    }

    /// Remove and return a line item
    pub fn remove(&mut self, id: &str) -> CartResult<LineItem> {
        let index = self
            .line_items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| CartError::LineItemNotFound { id: id.to_string() })?;

        if !self.line_items[index].removable {
            return Err(CartError::NotRemovable { id: id.to_string() });
        }

        debug!(id, "Removed line item");
        Ok(self.line_items.remove(index))
    }

    /// Update a line item in place through the registry
    pub fn update_line_item(
        &mut self,
        id: &str,
        data: &LineItemData,
        registry: &LineItemFactoryRegistry,
        context: &SalesContext,
    ) -> CartResult<()> {
        let item = self
            .get_mut(id)
            .ok_or_else(|| CartError::LineItemNotFound { id: id.to_string() })?;
        registry.update(item, data, context)
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.line_items.iter_mut().find(|item| item.id() == id)
    }

    /// Line items in insertion order
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Sum of quantities
    pub fn item_count(&self) -> u64 {
        self.line_items.iter().map(|i| u64::from(i.quantity())).sum()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}
