//! # Cart Commands
//!
//! Newline-delimited JSON commands applied to a single cart:
//!
//! ```text
//! {"op":"add","data":{"type":"product","referencedId":"p1","quantity":2}}
//! {"op":"update","id":"p1","data":{"quantity":3}}
//! {"op":"remove","id":"p1"}
//! ```

use crate::state::AppState;
use cart_core::{Cart, CartResult, LineItemData};
use serde::Deserialize;
use std::io::BufRead;
use tracing::{error, info, instrument};

/// One line of input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartCommand {
    /// Create a line item through the registry and add it
    Add { data: LineItemData },
    /// Update an existing line item through the registry
    Update { id: String, data: LineItemData },
    Remove { id: String },
}

impl CartCommand {
    pub fn parse(line: &str) -> CartResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Apply to `cart` using the state's registry and context
    #[instrument(skip_all, fields(op = self.op()))]
    pub fn apply(&self, cart: &mut Cart, state: &AppState) -> CartResult<()> {
        match self {
            CartCommand::Add { data } => {
                let item = state.registry.create(data, &state.context)?;
                cart.add(item)
            }
            CartCommand::Update { id, data } => {
                cart.update_line_item(id, data, &state.registry, &state.context)
            }
            CartCommand::Remove { id } => cart.remove(id).map(|_| ()),
        }
    }

    fn op(&self) -> &'static str {
        match self {
            CartCommand::Add { .. } => "add",
            CartCommand::Update { .. } => "update",
            CartCommand::Remove { .. } => "remove",
        }
    }
}

/// Outcome of processing an input stream
#[derive(Debug)]
pub struct RunSummary {
    pub cart: Cart,
    pub applied: usize,
    pub failed: usize,
}

/// Apply every command in `input` to a fresh cart.
///
/// Blank lines are skipped. Failing commands are logged and counted;
/// processing continues with the next line.
pub fn run(input: impl BufRead, state: &AppState) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary {
        cart: Cart::new(),
        applied: 0,
        failed: 0,
    };

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let result = CartCommand::parse(&line)
            .and_then(|command| command.apply(&mut summary.cart, state));

        match result {
            Ok(()) => summary.applied += 1,
            Err(e) => {
                error!(line = line_no, status = e.status_code(), "Command failed: {}", e);
                summary.failed += 1;
            }
        }
    }

    info!(
        applied = summary.applied,
        failed = summary.failed,
        line_items = summary.cart.len(),
        "Finished processing commands"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use cart_core::CartError;
    use std::io::Cursor;

    fn state() -> AppState {
        let config = AppConfig {
            registry_config_path: "missing/line_items.toml".into(),
            catalog_path: "missing/products.toml".into(),
            ..AppConfig::from_vars(|_| None).unwrap()
        };
        AppState::from_config(config).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        let add = CartCommand::parse(
            r#"{"op":"add","data":{"type":"product","referencedId":"p1","quantity":2}}"#,
        )
        .unwrap();
        assert_eq!(
            add,
            CartCommand::Add {
                data: LineItemData::new("product")
                    .with_referenced_id("p1")
                    .with_quantity(2)
            }
        );

        let remove = CartCommand::parse(r#"{"op":"remove","id":"p1"}"#).unwrap();
        assert_eq!(remove, CartCommand::Remove { id: "p1".into() });

        assert!(matches!(
            CartCommand::parse(r#"{"op":"explode"}"#),
            Err(CartError::Serialization(_))
        ));
    }

    #[test]
    fn test_apply_unknown_type() {
        let state = state();
        let mut cart = Cart::new();
        let command = CartCommand::parse(r#"{"op":"add","data":{"type":"unknown"}}"#).unwrap();

        let err = command.apply(&mut cart, &state).unwrap_err();

        assert!(matches!(err, CartError::TypeNotSupported { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_run_applies_and_counts_failures() {
        let input = r#"
{"op":"add","data":{"type":"product","referencedId":"p1","quantity":2}}
{"op":"add","data":{"type":"promotion","id":"promo","referencedId":"SUMMER10"}}
{"op":"add","data":{"type":"credit","payload":{"value":5}}}
{"op":"update","id":"p1","data":{"quantity":4,"label":"Widget"}}
{"op":"add","data":{"type":"unknown"}}
{"op":"remove","id":"promo"}
not json
"#;

        let summary = run(Cursor::new(input), &state()).unwrap();

        assert_eq!(summary.applied, 5);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.cart.len(), 2);

        let product = summary.cart.get("p1").unwrap();
        assert_eq!(product.quantity(), 4);
        assert_eq!(product.label.as_deref(), Some("Widget"));
        assert!(summary.cart.get("promo").is_none());
    }
}
