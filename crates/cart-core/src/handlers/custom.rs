//! # Custom Line Items
//!
//! Caller-defined entries with minimal validation: a label is required,
//! everything else (price, quantity, flags) is taken as given.

use super::CUSTOM_TYPE;
use crate::context::SalesContext;
use crate::error::{CartError, CartResult};
use crate::handler::LineItemHandler;
use crate::line_item::{LineItem, LineItemData};
use crate::product::{Currency, Price};
use tracing::debug;

fn custom_price(amount: Option<f64>, currency: Currency) -> CartResult<Option<Price>> {
    amount
        .map(|p| {
            Price::new(p, currency).ok_or_else(|| CartError::validation("price", "is out of range"))
        })
        .transpose()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomLineItemHandler;

impl LineItemHandler for CustomLineItemHandler {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn supports(&self, item_type: &str) -> bool {
        item_type == CUSTOM_TYPE
    }

    fn create(&self, data: &LineItemData, context: &SalesContext) -> CartResult<LineItem> {
        let label = data.label()?.ok_or_else(|| CartError::missing("label"))?;
        let quantity = data.quantity_or_default()?;
        let price = custom_price(data.price()?, context.currency)?;
        let referenced_id = data.referenced_id()?;
        let id = data.id_or_generate()?;

        let mut item = LineItem::new(id, CUSTOM_TYPE, quantity)?
            .with_label(label)
            .with_stackable(data.stackable.unwrap_or(true))
            .with_removable(data.removable.unwrap_or(true));

        item.referenced_id = referenced_id.map(str::to_string);
        item.price = price;
        if let Some(payload) = &data.payload {
            item.payload = payload.clone();
        }

        debug!(id = item.id(), label, quantity, "Created custom line item");
        Ok(item)
    }

    fn update(
        &self,
        line_item: &mut LineItem,
        data: &LineItemData,
        context: &SalesContext,
    ) -> CartResult<()> {
        let referenced_id = data.referenced_id()?;
        let quantity = data.quantity()?;
        let label = data.label()?;
        let price = custom_price(data.price()?, context.currency)?;

        if let Some(quantity) = quantity {
            line_item.set_quantity(quantity)?;
        }
        if let Some(referenced_id) = referenced_id {
            line_item.referenced_id = Some(referenced_id.to_string());
        }
        if let Some(label) = label {
            line_item.label = Some(label.to_string());
        }
        if let Some(price) = price {
            line_item.price = Some(price);
        }
        if let Some(payload) = &data.payload {
            line_item.merge_payload(payload);
        }

        Ok(())
    }
}
