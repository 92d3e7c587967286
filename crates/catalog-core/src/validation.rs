//! # Validation Module
//!
//! Input validation for every catalog operation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap / menu prompts)                                    │
//! │  └── Type parsing (integers, decimal prices)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: ProductStore operation                                       │
//! │  └── THIS MODULE: range rules, checked BEFORE any storage I/O          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage medium                                               │
//! │  └── NOT NULL columns / fixed record layout                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{validate_store_id, validate_product_name};
//!
//! validate_store_id(1).unwrap();
//! assert!(validate_product_name("").is_err());
//! ```

use crate::basket::Basket;
use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Whitespace-only counts as empty
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Apple").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_name".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a store identifier (must be > 0).
pub fn validate_store_id(store_id: i64) -> ValidationResult<()> {
    if store_id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "store_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock quantity (must be >= 0, zero means sold out).
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price (must be >= 0, zero is a free item).
///
/// ## Example
/// ```rust
/// use catalog_core::money::Money;
/// use catalog_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(0)).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a budget for affordability queries (must be >= 0).
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Basket Validators
// =============================================================================

/// Validates that a basket has at least one line.
pub fn validate_basket(basket: &Basket) -> ValidationResult<()> {
    if basket.is_empty() {
        return Err(ValidationError::Empty {
            field: "basket".to_string(),
        });
    }

    Ok(())
}

/// Validates that no basket line requests a negative quantity.
///
/// Runs over the whole basket up front so a bad line late in the basket
/// is reported before any lookup happens.
pub fn validate_basket_quantities(basket: &Basket) -> ValidationResult<()> {
    if basket.iter().any(|(_, qty)| qty < 0) {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
