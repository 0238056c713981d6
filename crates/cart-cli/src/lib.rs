//! # cart-cli
//!
//! Command-line driver for the lightning-cart line item registry.
//!
//! This crate provides:
//! - Environment-based configuration (`AppConfig`)
//! - Startup loading of the registry config and product catalog (`AppState`)
//! - A newline-delimited JSON command loop over one cart (`commands::run`)
//!
//! ## Commands
//!
//! | op | Fields | Effect |
//! |----|--------|--------|
//! | `add` | `data` | Create a line item and add it to the cart |
//! | `update` | `id`, `data` | Update a line item in place |
//! | `remove` | `id` | Remove a line item |

pub mod commands;
pub mod state;

pub use commands::{run, CartCommand, RunSummary};
pub use state::{AppConfig, AppState};
