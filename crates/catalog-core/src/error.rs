//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule failures (stock, basket)         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── StoreError       - Everything a ProductStore can return           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → "Error: ..." on CLI  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A basket asks for more units than the store holds.
    ///
    /// ## User Workflow
    /// ```text
    /// Basket { Apple: 12 }
    ///      │
    ///      ▼
    /// Check stock: store 1 holds 10
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Apple", store_id: 1, available: 10, requested: 12 }
    /// ```
    #[error(
        "Insufficient stock for {product} in store {store_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        product: String,
        store_id: i64,
        available: i64,
        requested: i64,
    },

    /// A basket line names a product the store does not carry.
    #[error("Product '{product}' not found in store with ID {store_id}")]
    ProductNotInStore { product: String, store_id: i64 },

    /// A basket total does not fit in the money type.
    #[error("Basket total overflows for {product}")]
    TotalOverflow { product: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any storage I/O and never retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be a positive integer")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// A collection argument has no entries.
    #[error("{field} cannot be empty")]
    Empty { field: String },

    /// Invalid format (unparseable number, too many decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Apple".to_string(),
            store_id: 1,
            available: 10,
            requested: 12,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Apple in store 1: available 10, requested 12"
        );

        let err = CoreError::ProductNotInStore {
            product: "Banana".to_string(),
            store_id: 1,
        };
        assert_eq!(
            err.to_string(),
            "Product 'Banana' not found in store with ID 1"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "store_id".to_string(),
        };
        assert_eq!(err.to_string(), "store_id must be a positive integer");

        let err = ValidationError::Negative {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount cannot be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
