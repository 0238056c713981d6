//! # cart-core
//!
//! Line item factory registry for the lightning-cart engine.
//!
//! This crate provides:
//! - `LineItemHandler` trait for implementing per-type line item factories
//! - Built-in handlers for product, promotion, credit and custom items
//! - `LineItemFactoryRegistry` to resolve a type tag to its handler
//! - `Cart` to hold the created line items
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{Cart, LineItemData, LineItemFactoryRegistry, SalesContext};
//!
//! // Build the registry once at startup
//! let registry = LineItemFactoryRegistry::with_defaults();
//! let context = SalesContext::default();
//!
//! // Create a line item and put it in a cart
//! let data = LineItemData::new("product").with_referenced_id("rang-play-rs").with_quantity(2);
//! let item = registry.create(&data, &context)?;
//!
//! let mut cart = Cart::new();
//! cart.add(item)?;
//! ```

pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod line_item;
pub mod product;
pub mod registry;

// Re-exports for convenience
pub use cart::Cart;
pub use config::{HandlerKind, RegistryConfig};
pub use context::SalesContext;
pub use error::{CartError, CartResult};
pub use handler::{BoxedLineItemHandler, LineItemHandler};
pub use handlers::{
    CreditLineItemHandler, CustomLineItemHandler, ProductLineItemHandler,
    PromotionLineItemHandler,
};
pub use line_item::{LineItem, LineItemData, Payload};
pub use product::{Currency, Price, Product, ProductCatalog};
pub use registry::{CollisionPolicy, LineItemFactoryRegistry};
