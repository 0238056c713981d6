//! # Cart Error Types
//!
//! Typed error handling for line item creation and cart mutation.
//! All registry and handler operations return `Result<T, CartError>`.

use thiserror::Error;

/// Core error type for all line item and cart operations
#[derive(Debug, Error)]
pub enum CartError {
    /// No registered handler claims the line item type
    #[error("Line item type not supported: {item_type}")]
    TypeNotSupported { item_type: String },

    /// A required field is missing or malformed
    #[error("Invalid field '{field}': {message}")]
    Validation { field: String, message: String },

    /// More than one handler claims the type and the registry rejects collisions
    #[error("Line item type '{item_type}' is claimed by multiple handlers: {}", handlers.join(", "))]
    AmbiguousType {
        item_type: String,
        handlers: Vec<String>,
    },

    /// Referenced product does not exist in the catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Referenced product exists but cannot be purchased
    #[error("Product is not available: {product_id}")]
    ProductInactive { product_id: String },

    /// No line item with this id in the cart
    #[error("Line item not found: {id}")]
    LineItemNotFound { id: String },

    /// Quantity change requested on a fixed-quantity line item
    #[error("Line item is not stackable: {id}")]
    NotStackable { id: String },

    /// Removal requested for a line item that must stay in the cart
    #[error("Line item cannot be removed: {id}")]
    NotRemovable { id: String },

    /// Configuration errors (bad handler list, unreadable file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CartError {
    /// Shorthand for a field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CartError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a required field that was absent or empty
    pub fn missing(field: impl Into<String>) -> Self {
        Self::validation(field, "field is required")
    }

    /// The offending field, for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            CartError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::TypeNotSupported { .. } => 400,
            CartError::Validation { .. } => 400,
            CartError::AmbiguousType { .. } => 500,
            CartError::ProductNotFound { .. } => 404,
            CartError::ProductInactive { .. } => 400,
            CartError::LineItemNotFound { .. } => 404,
            CartError::NotStackable { .. } => 409,
            CartError::NotRemovable { .. } => 409,
            CartError::Configuration(_) => 500,
            CartError::Serialization(_) => 400,
        }
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_field() {
        let err = CartError::missing("referencedId");
        assert_eq!(err.field(), Some("referencedId"));
        assert_eq!(err.to_string(), "Invalid field 'referencedId': field is required");

        assert_eq!(
            CartError::TypeNotSupported {
                item_type: "x".into()
            }
            .field(),
            None
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CartError::missing("label").status_code(), 400);
        assert_eq!(
            CartError::LineItemNotFound { id: "x".into() }.status_code(),
            404
        );
        assert_eq!(CartError::NotRemovable { id: "x".into() }.status_code(), 409);
    }

    #[test]
    fn test_ambiguous_message() {
        let err = CartError::AmbiguousType {
            item_type: "dup".into(),
            handlers: vec!["first".into(), "second".into()],
        };
        assert_eq!(
            err.to_string(),
            "Line item type 'dup' is claimed by multiple handlers: first, second"
        );
    }
}
