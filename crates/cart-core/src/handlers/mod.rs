//! # Default Handlers
//!
//! Built-in handlers for the standard line item types.

pub mod credit;
pub mod custom;
pub mod product;
pub mod promotion;

pub use credit::CreditLineItemHandler;
pub use custom::CustomLineItemHandler;
pub use product::ProductLineItemHandler;
pub use promotion::PromotionLineItemHandler;

/// Type tag for catalog products
pub const PRODUCT_TYPE: &str = "product";
/// Type tag for promotions
pub const PROMOTION_TYPE: &str = "promotion";
/// Type tag for credits
pub const CREDIT_TYPE: &str = "credit";
/// Type tag for caller-defined items
pub const CUSTOM_TYPE: &str = "custom";
