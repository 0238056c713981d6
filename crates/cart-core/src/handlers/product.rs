//! # Product Line Items
//!
//! Line items pointing at a catalog product. When a catalog is attached,
//! the referenced product must exist and be active, and label and price
//! default from the catalog entry.

use super::PRODUCT_TYPE;
use crate::context::SalesContext;
use crate::error::{CartError, CartResult};
use crate::handler::LineItemHandler;
use crate::line_item::{LineItem, LineItemData};
use crate::product::{Product, ProductCatalog};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ProductLineItemHandler {
    catalog: Option<Arc<ProductCatalog>>,
}

impl ProductLineItemHandler {
    /// Handler that accepts any non-empty `referencedId`
    pub fn new() -> Self {
        Self { catalog: None }
    }

    /// Handler that checks `referencedId` against `catalog`
    pub fn with_catalog(catalog: Arc<ProductCatalog>) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    fn lookup(&self, product_id: &str) -> CartResult<Option<&Product>> {
        let Some(catalog) = &self.catalog else {
            return Ok(None);
        };

        let product = catalog.get(product_id).ok_or_else(|| CartError::ProductNotFound {
            product_id: product_id.to_string(),
        })?;

        if !product.active {
            return Err(CartError::ProductInactive {
                product_id: product_id.to_string(),
            });
        }

        Ok(Some(product))
    }
}

impl LineItemHandler for ProductLineItemHandler {
    fn name(&self) -> &'static str {
        "product"
    }

    fn supports(&self, item_type: &str) -> bool {
        item_type == PRODUCT_TYPE
    }

    fn create(&self, data: &LineItemData, _context: &SalesContext) -> CartResult<LineItem> {
        let referenced_id = data.require_referenced_id()?;
        let quantity = data.quantity_or_default()?;
        let label = data.label()?;
        let product = self.lookup(referenced_id)?;

        // Same product added twice shares an id so the cart can stack it
        let id = data.id_or_else(|| referenced_id.to_string())?;

        let mut item = LineItem::new(id, PRODUCT_TYPE, quantity)?.with_referenced_id(referenced_id);

        if let Some(product) = product {
            item.label = Some(product.name.clone());
            item.price = Some(product.price.clone());
        }
        if let Some(label) = label {
            item.label = Some(label.to_string());
        }
        if let Some(payload) = &data.payload {
            item.payload = payload.clone();
        }

        debug!(id = item.id(), referenced_id, quantity, "Created product line item");
        Ok(item)
    }

    fn update(
        &self,
        line_item: &mut LineItem,
        data: &LineItemData,
        _context: &SalesContext,
    ) -> CartResult<()> {
        // Validate everything before touching the item
        let referenced_id = data.referenced_id()?;
        let quantity = data.quantity()?;
        let label = data.label()?;

        // An item keyed by its product would otherwise collide with the next add
        if let Some(new_ref) = referenced_id {
            let current = line_item.referenced_id.as_deref();
            if current == Some(line_item.id()) && current != Some(new_ref) {
                return Err(CartError::validation(
                    "referencedId",
                    "cannot change on a line item keyed by its product",
                ));
            }
        }

        let product = match referenced_id {
            Some(id) => self.lookup(id)?,
            None => None,
        };

        if let Some(quantity) = quantity {
            line_item.set_quantity(quantity)?;
        }
        if let Some(referenced_id) = referenced_id {
            line_item.referenced_id = Some(referenced_id.to_string());
        }
        if let Some(product) = product {
            line_item.price = Some(product.price.clone());
            if label.is_none() {
                line_item.label = Some(product.name.clone());
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Currency, Price};

    fn catalog() -> Arc<ProductCatalog> {
        Arc::new(
            ProductCatalog::new()
                .with_product(Product::new("p1", "Widget", Price::from_cents(1999, Currency::USD)))
                .with_product(
                    Product::new("p2", "Retired", Price::from_cents(500, Currency::USD)).inactive(),
                ),
        )
    }

    #[test]
    fn test_create_without_catalog() {
        let handler = ProductLineItemHandler::new();
        let data = LineItemData::new("product")
            .with_referenced_id("p1")
            .with_quantity(5);

        let item = handler.create(&data, &SalesContext::default()).unwrap();

        assert_eq!(item.item_type(), "product");
        assert_eq!(item.id(), "p1");
        assert_eq!(item.referenced_id.as_deref(), Some("p1"));
        assert_eq!(item.quantity(), 5);
        assert!(item.stackable);
        assert!(item.price.is_none());
    }

    #[test]
    fn test_create_requires_referenced_id() {
        let handler = ProductLineItemHandler::new();
        let err = handler
            .create(&LineItemData::new("product"), &SalesContext::default())
            .unwrap_err();

        assert_eq!(err.field(), Some("referencedId"));
    }

    #[test]
    fn test_create_with_catalog_defaults() {
        let handler = ProductLineItemHandler::with_catalog(catalog());
        let item = handler
            .create(
                &LineItemData::new("product").with_referenced_id("p1"),
                &SalesContext::default(),
            )
            .unwrap();

        assert_eq!(item.label.as_deref(), Some("Widget"));
        assert_eq!(item.price.as_ref().unwrap().amount, 1999);
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_create_rejects_unknown_and_inactive_products() {
        let handler = ProductLineItemHandler::with_catalog(catalog());
        let ctx = SalesContext::default();

        assert!(matches!(
            handler.create(&LineItemData::new("product").with_referenced_id("nope"), &ctx),
            Err(CartError::ProductNotFound { .. })
        ));
        assert!(matches!(
            handler.create(&LineItemData::new("product").with_referenced_id("p2"), &ctx),
            Err(CartError::ProductInactive { .. })
        ));
    }

    #[test]
    fn test_update_changes_quantity_and_reference() {
        let handler = ProductLineItemHandler::with_catalog(catalog());
        let ctx = SalesContext::default();
        let mut item = handler
            .create(
                &LineItemData::new("product")
                    .with_id("line-1")
                    .with_referenced_id("p1"),
                &ctx,
            )
            .unwrap();

        let update = LineItemData::default().with_quantity(3).with_label("Gift widget");
        handler.update(&mut item, &update, &ctx).unwrap();

        assert_eq!(item.id(), "line-1");
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.label.as_deref(), Some("Gift widget"));

        let bad = LineItemData::default().with_referenced_id("p2").with_quantity(9);
        assert!(handler.update(&mut item, &bad, &ctx).is_err());
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.referenced_id.as_deref(), Some("p1"));
    }

    #[test]
    fn test_update_keeps_product_keyed_reference() {
        let handler = ProductLineItemHandler::with_catalog(Arc::new(
            ProductCatalog::new()
                .with_product(Product::new("p1", "Widget", Price::from_cents(1999, Currency::USD)))
                .with_product(Product::new("p3", "Gadget", Price::from_cents(750, Currency::USD))),
        ));
        let ctx = SalesContext::default();
        let mut item = handler
            .create(&LineItemData::new("product").with_referenced_id("p1"), &ctx)
            .unwrap();
        let before = item.clone();

        let update = LineItemData::default().with_referenced_id("p3").with_quantity(2);
        let err = handler.update(&mut item, &update, &ctx).unwrap_err();

        assert_eq!(err.field(), Some("referencedId"));
        assert_eq!(item, before);

        // Re-stating the same product is fine
        let same = LineItemData::default().with_referenced_id("p1").with_quantity(2);
        handler.update(&mut item, &same, &ctx).unwrap();
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn test_update_moves_reference_on_explicit_id() {
        let handler = ProductLineItemHandler::with_catalog(Arc::new(
            ProductCatalog::new()
                .with_product(Product::new("p1", "Widget", Price::from_cents(1999, Currency::USD)))
                .with_product(Product::new("p3", "Gadget", Price::from_cents(750, Currency::USD))),
        ));
        let ctx = SalesContext::default();
        let mut item = handler
            .create(
                &LineItemData::new("product").with_id("line-1").with_referenced_id("p1"),
                &ctx,
            )
            .unwrap();

        handler
            .update(&mut item, &LineItemData::default().with_referenced_id("p3"), &ctx)
            .unwrap();

        assert_eq!(item.id(), "line-1");
        assert_eq!(item.referenced_id.as_deref(), Some("p3"));
        assert_eq!(item.label.as_deref(), Some("Gadget"));
        assert_eq!(item.price.as_ref().unwrap().amount, 750);
    }
}
