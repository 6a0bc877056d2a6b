//! # Error Types
//!
//! Domain-specific error types for gym-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gym-core errors (this file)                                           │
//! │  ├── CoreError        - Sale/void business rule violations             │
//! │  ├── ValidationError  - Field-level input failures                     │
//! │  └── ErrorKind        - Machine-readable code for the HTTP layer       │
//! │                                                                         │
//! │  gym-db errors (separate crate)                                        │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── EngineError      - CoreError | DbError from the SaleEngine        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → HTTP response       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, amounts)
//! 3. Every variant maps to exactly one [`ErrorKind`]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Sale engine business rule violations.
///
/// All of these are detected before the engine writes anything, except
/// `InsufficientStock` and `SaleCannotBeVoided`, which the storage layer can
/// also raise when a concurrent request wins the race (the transaction is
/// rolled back in that case).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required identity, reference or the line item set is missing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Line quantity is zero or negative.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: i64 },

    /// Explicit unit price is negative.
    #[error("Invalid unit price {price_cents} for product {product_id}")]
    InvalidPrice {
        product_id: String,
        price_cents: i64,
    },

    /// Line discount is negative.
    #[error("Invalid discount {discount_cents} for product {product_id}")]
    InvalidDiscount {
        product_id: String,
        discount_cents: i64,
    },

    /// Line discount is larger than the line gross.
    #[error(
        "Discount {discount_cents} exceeds line total {gross_cents} for product {product_id}"
    )]
    DiscountExceedsTotal {
        product_id: String,
        discount_cents: i64,
        gross_cents: i64,
    },

    /// A referenced sale, product or payment method does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Product exists but is disabled.
    #[error("Product is not active: {0}")]
    ProductNotActive(String),

    /// Payment method exists but is disabled.
    #[error("Payment method is not active: {0}")]
    PaymentMethodNotActive(String),

    /// Requested quantity (summed across lines) exceeds stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale lines: PROTEIN-BAR ×6, PROTEIN-BAR ×6
    ///      │
    ///      ▼
    /// Summed per product: PROTEIN-BAR → 12
    ///      │
    ///      ▼
    /// Check stock: available=10
    ///      │
    ///      ▼
    /// InsufficientStock { available: 10, requested: 12 }
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Target sale is not a completed normal sale.
    #[error("Sale {sale_id} cannot be voided ({reason})")]
    SaleCannotBeVoided { sale_id: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Returns the machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) | CoreError::Validation(_) => ErrorKind::InvalidInput,
            CoreError::InvalidQuantity { .. } => ErrorKind::InvalidQuantity,
            CoreError::InvalidPrice { .. } => ErrorKind::InvalidPrice,
            CoreError::InvalidDiscount { .. } => ErrorKind::InvalidDiscount,
            CoreError::DiscountExceedsTotal { .. } => ErrorKind::DiscountExceedsTotal,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::ProductNotActive(_) => ErrorKind::ProductNotActive,
            CoreError::PaymentMethodNotActive(_) => ErrorKind::PaymentMethodNotActive,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::SaleCannotBeVoided { .. } => ErrorKind::SaleCannotBeVoided,
        }
    }
}

// =============================================================================
// Error Kind
// =============================================================================

/// Error codes handed to the HTTP layer.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (e.code) {
///   case 'INSUFFICIENT_STOCK': showStockWarning(e.message); break;
///   case 'SALE_CANNOT_BE_VOIDED': refreshHistory(); break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidInput,
    InvalidQuantity,
    InvalidPrice,
    InvalidDiscount,
    DiscountExceedsTotal,
    NotFound,
    ProductNotActive,
    PaymentMethodNotActive,
    InsufficientStock,
    SaleCannotBeVoided,
    /// Database failure; the operation was rolled back.
    Storage,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by catalog and registry maintenance before rows are written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

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
            product_id: "p-1".to_string(),
            available: 10,
            requested: 12,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for p-1: available 10, requested 12"
        );

        let err = CoreError::not_found("Sale", "s-1");
        assert_eq!(err.to_string(), "Sale not found: s-1");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_error_kinds() {
        let err = CoreError::DiscountExceedsTotal {
            product_id: "p-1".to_string(),
            discount_cents: 2500,
            gross_cents: 2000,
        };
        assert_eq!(err.kind(), ErrorKind::DiscountExceedsTotal);

        let err = CoreError::SaleCannotBeVoided {
            sale_id: "s-1".to_string(),
            reason: "already voided".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::SaleCannotBeVoided);
    }

    #[test]
    fn test_error_kind_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorKind::PaymentMethodNotActive).unwrap();
        assert_eq!(json, "\"PAYMENT_METHOD_NOT_ACTIVE\"");
    }
}
