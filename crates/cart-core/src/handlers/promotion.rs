//! # Promotion Line Items
//!
//! Discount entries pointing at a promotion. Quantity is always 1.

use super::PROMOTION_TYPE;
use crate::context::SalesContext;
use crate::error::CartResult;
use crate::handler::LineItemHandler;
use crate::line_item::{LineItem, LineItemData};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct PromotionLineItemHandler;

impl LineItemHandler for PromotionLineItemHandler {
    fn name(&self) -> &'static str {
        "promotion"
    }

    fn supports(&self, item_type: &str) -> bool {
        item_type == PROMOTION_TYPE
    }

    fn create(&self, data: &LineItemData, _context: &SalesContext) -> CartResult<LineItem> {
        let referenced_id = data.require_referenced_id()?;
        let label = data.label()?;
        let id = data.id_or_generate()?;

        let mut item = LineItem::new(id, PROMOTION_TYPE, 1)?
            .with_referenced_id(referenced_id)
            .with_stackable(false);

        item.label = label.map(str::to_string);
        if let Some(payload) = &data.payload {
            item.payload = payload.clone();
        }

        debug!(id = item.id(), referenced_id, "Created promotion line item");
        Ok(item)
    }

    fn update(
        &self,
        line_item: &mut LineItem,
        data: &LineItemData,
        _context: &SalesContext,
    ) -> CartResult<()> {
        let referenced_id = data.referenced_id()?;
        let label = data.label()?;

        if let Some(referenced_id) = referenced_id {
            line_item.referenced_id = Some(referenced_id.to_string());
        }
        if let Some(label) = label {
            line_item.label = Some(label.to_string());
        }
        if let Some(payload) = &data.payload {
            line_item.merge_payload(payload);
        }

        Ok(())
    }
}
