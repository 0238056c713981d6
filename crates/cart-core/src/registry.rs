//! # Line Item Factory Registry
//!
//! Ordered dispatch table from line item type tags to handlers.
//!
//! Handlers are registered once at startup. Resolution walks them in
//! registration order and picks the first whose `supports` predicate
//! accepts the type. When several handlers claim the same type the
//! `CollisionPolicy` decides whether the earlier one wins or resolution
//! fails.
//!
//! The registry only builds and mutates line items; putting the result in
//! a cart is the caller's job (see [`Cart::add`](crate::cart::Cart::add)).

use crate::config::{HandlerKind, RegistryConfig};
use crate::context::SalesContext;
use crate::error::{CartError, CartResult};
use crate::handler::{BoxedLineItemHandler, LineItemHandler};
use crate::handlers::{
    CreditLineItemHandler, CustomLineItemHandler, ProductLineItemHandler,
    PromotionLineItemHandler,
};
use crate::line_item::{LineItem, LineItemData};
use crate::product::ProductCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What to do when more than one handler supports a type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Earliest registration wins; later claimants are shadowed
    #[default]
    FirstMatch,
    /// Resolution fails with `CartError::AmbiguousType`
    Reject,
}

/// Registry of line item handlers
#[derive(Clone, Default)]
pub struct LineItemFactoryRegistry {
    handlers: Vec<BoxedLineItemHandler>,
    collision_policy: CollisionPolicy,
}

impl LineItemFactoryRegistry {
    /// Create an empty first-match registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given collision policy
    pub fn with_policy(collision_policy: CollisionPolicy) -> Self {
        Self {
            handlers: Vec::new(),
            collision_policy,
        }
    }

    /// Registry with the four built-in handlers and no product catalog
    pub fn with_defaults() -> Self {
        Self::from_config(&RegistryConfig::default(), None)
    }

    /// Build a registry from configuration.
    ///
    /// The product handler checks references against `catalog` when one
    /// is given.
    pub fn from_config(config: &RegistryConfig, catalog: Option<Arc<ProductCatalog>>) -> Self {
        let mut registry = Self::with_policy(config.collision_policy);

        for kind in &config.handlers {
            let handler: BoxedLineItemHandler = match kind {
                HandlerKind::Product => match &catalog {
                    Some(catalog) => Arc::new(ProductLineItemHandler::with_catalog(catalog.clone())),
                    None => Arc::new(ProductLineItemHandler::new()),
                },
                HandlerKind::Promotion => Arc::new(PromotionLineItemHandler),
                HandlerKind::Credit => Arc::new(CreditLineItemHandler),
                HandlerKind::Custom => Arc::new(CustomLineItemHandler),
            };
            registry.register(handler);
        }

        info!(
            handlers = ?registry.handler_names(),
            policy = ?registry.collision_policy,
            catalog = catalog.is_some(),
            "Line item registry ready"
        );
        registry
    }

    /// Append a handler. No deduplication; order decides collisions.
    pub fn register(&mut self, handler: BoxedLineItemHandler) {
        debug!(handler = handler.name(), position = self.handlers.len(), "Registered line item handler");
        self.handlers.push(handler);
    }

    /// Register with builder pattern
    pub fn with_handler(mut self, handler: BoxedLineItemHandler) -> Self {
        self.register(handler);
        self
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Handler names in registration order
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Names of every handler that supports `item_type`, in registration order
    pub fn claimants(&self, item_type: &str) -> Vec<&'static str> {
        self.handlers
            .iter()
            .filter(|h| h.supports(item_type))
            .map(|h| h.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Find the handler for `item_type`
    pub fn resolve(&self, item_type: &str) -> CartResult<&dyn LineItemHandler> {
        let mut candidates = self.handlers.iter().filter(|h| h.supports(item_type));

        let chosen = candidates.next().ok_or_else(|| CartError::TypeNotSupported {
            item_type: item_type.to_string(),
        })?;

        let shadowed: Vec<&'static str> = candidates.map(|h| h.name()).collect();
        if !shadowed.is_empty() {
            match self.collision_policy {
                CollisionPolicy::FirstMatch => {
                    warn!(
                        item_type,
                        handler = chosen.name(),
                        ?shadowed,
                        "Line item type claimed by multiple handlers, using first registered"
                    );
                }
                CollisionPolicy::Reject => {
                    return Err(CartError::AmbiguousType {
                        item_type: item_type.to_string(),
                        handlers: std::iter::once(chosen.name())
                            .chain(shadowed)
                            .map(String::from)
                            .collect(),
                    });
                }
            }
        }

        debug!(item_type, handler = chosen.name(), "Resolved line item handler");
        Ok(&**chosen)
    }

    /// Build a new line item with the handler for `data.type`
    pub fn create(&self, data: &LineItemData, context: &SalesContext) -> CartResult<LineItem> {
        let item_type = data.require_type()?;
        self.resolve(item_type)?.create(data, context)
    }

    /// Apply `data` to `line_item` with the handler for its existing type
    pub fn update(
        &self,
        line_item: &mut LineItem,
        data: &LineItemData,
        context: &SalesContext,
    ) -> CartResult<()> {
        let handler = self.resolve(line_item.item_type())?;
        handler.update(line_item, data, context)
    }
}

impl std::fmt::Debug for LineItemFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineItemFactoryRegistry")
            .field("handlers", &self.handler_names())
            .field("collision_policy", &self.collision_policy)
            .finish()
    }
}
