//! # line-items
//!
//! Applies line item commands from stdin to a cart and prints the cart.
//!
//! ## Usage
//!
//! ```bash
//! # Optional configuration
//! export LINE_ITEM_CONFIG=config/line_items.toml
//! export PRODUCT_CATALOG=config/products.toml
//! export CART_CURRENCY=usd
//!
//! echo '{"op":"add","data":{"type":"product","referencedId":"rang-play-rs","quantity":2}}' | line-items
//! ```

use cart_cli::{commands, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the cart JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    info!("Sales channel: {}", state.context.channel_id);
    info!("Currency: {}", state.context.currency);
    info!("Line item handlers: {:?}", state.registry.handler_names());

    let summary = commands::run(std::io::stdin().lock(), &state)?;

    println!("{}", serde_json::to_string_pretty(&summary.cart)?);

    if summary.failed > 0 {
        anyhow::bail!("{} of {} commands failed", summary.failed, summary.failed + summary.applied);
    }
    Ok(())
}
