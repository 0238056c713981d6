//! # Credit Line Items
//!
//! Store credit or goodwill refunds. The amount lives in `payload.value`
//! and is recorded as a negative price in the context currency.

use super::CREDIT_TYPE;
use crate::context::SalesContext;
use crate::error::{CartError, CartResult};
use crate::handler::LineItemHandler;
use crate::line_item::{LineItem, LineItemData};
use crate::product::{Currency, Price};
use tracing::debug;

const VALUE_KEY: &str = "value";

#[derive(Debug, Clone, Copy, Default)]
pub struct CreditLineItemHandler;

fn credit_value(data: &LineItemData) -> CartResult<Option<f64>> {
    // An explicit null would leave payload and price disagreeing
    let explicit_null = data
        .payload
        .as_ref()
        .is_some_and(|p| p.get(VALUE_KEY).is_some_and(|v| v.is_null()));
    if explicit_null {
        return Err(CartError::validation("payload.value", "must not be null"));
    }

    match data.payload_number(VALUE_KEY)? {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(CartError::validation(
            "payload.value",
            "must be a positive amount",
        )),
        other => Ok(other),
    }
}

fn credit_price(value: f64, currency: Currency) -> CartResult<Price> {
    let price = Price::new(-value, currency)
        .ok_or_else(|| CartError::validation("payload.value", "is out of range"))?;
    if price.amount == 0 {
        return Err(CartError::validation(
            "payload.value",
            format!("rounds to zero in {currency}"),
        ));
    }
    Ok(price)
}

impl LineItemHandler for CreditLineItemHandler {
    fn name(&self) -> &'static str {
        "credit"
    }

    fn supports(&self, item_type: &str) -> bool {
        item_type == CREDIT_TYPE
    }

    fn create(&self, data: &LineItemData, context: &SalesContext) -> CartResult<LineItem> {
        let value = credit_value(data)?.ok_or_else(|| CartError::missing("payload.value"))?;
        let label = data.label()?;
        let id = data.id_or_generate()?;

        let mut item = LineItem::new(id, CREDIT_TYPE, 1)?
            .with_label(label.unwrap_or("Credit"))
            .with_price(credit_price(value, context.currency)?)
            .with_stackable(false);

        if let Some(payload) = &data.payload {
            item.payload = payload.clone();
        }

        debug!(id = item.id(), value, currency = %context.currency, "Created credit line item");
        Ok(item)
    }

    fn update(
        &self,
        line_item: &mut LineItem,
        data: &LineItemData,
        context: &SalesContext,
    ) -> CartResult<()> {
        let value = credit_value(data)?;
        let label = data.label()?;
        let price = value
            .map(|v| credit_price(v, context.currency))
            .transpose()?;

        if let Some(label) = label {
            line_item.label = Some(label.to_string());
        }
        if let Some(payload) = &data.payload {
            line_item.merge_payload(payload);
        }
        if let Some(price) = price {
            line_item.price = Some(price);
        }

        Ok(())
    }
}
