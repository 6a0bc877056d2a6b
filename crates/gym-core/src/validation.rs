//! # Validation Module
//!
//! Field-level validation for catalog and registry maintenance.
//!
//! Sale lines are validated by [`crate::ledger`], which reports the sale
//! engine's own error kinds (`InvalidQuantity`, `InvalidPrice`, ...). The
//! helpers here cover the rows the engine only reads: products and payment
//! methods.
//!
//! ## Usage
//! ```rust
//! use gym_core::validation::{validate_name, validate_price_cents};
//!
//! assert!(validate_name("name", "Protein Bar").is_ok());
//! assert!(validate_price_cents(-100).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::NewProduct;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of product and payment method names.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a required text field is present (non-blank).
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a display name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters after trimming
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_required(field, name)?;

    if name.trim().chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a product before it enters the catalog.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &product.name)?;
    validate_price_cents(product.unit_price_cents)?;
    validate_stock(product.stock)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Whey Protein 1kg").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut product = NewProduct {
            name: "Shaker Bottle".to_string(),
            description: None,
            unit_price_cents: 899,
            stock: 20,
            status: ProductStatus::Active,
        };
        assert!(validate_new_product(&product).is_ok());

        product.stock = -1;
        let err = validate_new_product(&product).unwrap_err();
        assert_eq!(err.to_string(), "stock must not be negative");
    }
}
