//! # Line Item Handler Trait
//!
//! One implementation per line item type. The registry picks a handler by
//! asking each one whether it `supports` the type tag, then delegates.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  LineItemHandler (trait)                    │
//! │  ├── supports()                                             │
//! │  ├── create()                                               │
//! │  ├── update()                                               │
//! │  └── name()                                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!       ┌──────────────┬─────┴────────┬──────────────┐
//!       │              │              │              │
//!  ┌────┴────┐   ┌─────┴─────┐   ┌────┴───┐   ┌──────┴─────┐
//!  │ Product │   │ Promotion │   │ Credit │   │   Custom   │
//!  └─────────┘   └───────────┘   └────────┘   └────────────┘
//! ```

use crate::context::SalesContext;
use crate::error::CartResult;
use crate::line_item::{LineItem, LineItemData};
use std::sync::Arc;

/// Creates and updates line items of the types it supports.
///
/// Implementations are shared across requests and must not hold mutable
/// shared state.
pub trait LineItemHandler: Send + Sync {
    /// Handler name (for logging and collision reports)
    fn name(&self) -> &'static str;

    /// Whether this handler owns `item_type`. Must be pure and total.
    fn supports(&self, item_type: &str) -> bool;

    /// Build a new line item from `data`.
    ///
    /// Missing or malformed fields fail with `CartError::Validation`
    /// naming the field.
    fn create(&self, data: &LineItemData, context: &SalesContext) -> CartResult<LineItem>;

    /// Apply the fields this handler recognizes from `data` onto
    /// `line_item`. Unrecognized fields are ignored.
    fn update(
        &self,
        line_item: &mut LineItem,
        data: &LineItemData,
        context: &SalesContext,
    ) -> CartResult<()>;
}

/// Type alias for a shared handler (dynamic dispatch)
pub type BoxedLineItemHandler = Arc<dyn LineItemHandler>;
