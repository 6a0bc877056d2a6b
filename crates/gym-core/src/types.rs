//! # Domain Types
//!
//! Core domain types of the gym point-of-sale.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  PaymentMethod  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  unit_price     │   │  kind / status  │   │  method_type    │       │
//! │  │  stock          │   │  total_cents    │   │  status         │       │
//! │  │  status         │   │  voided_sale_id │   └─────────────────┘       │
//! │  └─────────────────┘   └────────┬────────┘                              │
//! │                                 │ owns 1..n                             │
//! │                        ┌────────▼────────┐                              │
//! │                        │   SaleDetail    │                              │
//! │                        │  gross/discount │                              │
//! │                        │  net, quantity  │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All monetary fields are integer cents. Quantities are unit counts and are
//! never negative, not even on a void sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// Whether a product can be sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// A retail product sold at the front desk (drinks, supplements, gear).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Current list price in cents.
    pub unit_price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub status: ProductStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the list price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Checks whether `quantity` units can be taken from current stock.
    #[inline]
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub status: ProductStatus,
}

impl NewProduct {
    /// Builds the catalog row. Call [`crate::validation::validate_new_product`] first.
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            unit_price_cents: self.unit_price_cents,
            stock: self.stock,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Whether a payment method can be used for new sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodStatus {
    #[default]
    Active,
    Inactive,
}

/// Common payment method families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Cash,
    Card,
    Transfer,
}

/// A payment method a sale can be settled with.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub method_type: PaymentMethodType,
    pub status: PaymentMethodStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl PaymentMethod {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == PaymentMethodStatus::Active
    }
}

// =============================================================================
// Sale Kind / Status
// =============================================================================

/// Distinguishes original transactions from their reversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleKind {
    /// A regular sale that took stock out.
    Normal,
    /// A compensating sale pointing back at the sale it cancels.
    Void,
}

/// Lifecycle of a sale header: `Pending → Completed → Voided`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Pending,
    Completed,
    Voided,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header: the aggregate record of one transaction.
///
/// ## Invariants
/// - `kind == Void` ⇔ `voided_sale_id.is_some()`
/// - `total_cents == Σ detail.net_cents`
/// - `total_discount_cents == Σ detail.discount_cents`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub total_cents: i64,
    pub total_discount_cents: i64,
    /// The user who rang up (or voided) the sale.
    pub user_id: String,
    pub kind: SaleKind,
    pub status: SaleStatus,
    pub payment_method_id: String,
    /// For void sales: the sale this one cancels.
    pub voided_sale_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn total_discount(&self) -> Money {
        Money::from_cents(self.total_discount_cents)
    }

    #[inline]
    pub fn is_normal(&self) -> bool {
        self.kind == SaleKind::Normal
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.kind == SaleKind::Void
    }

    /// Only completed normal sales can be voided.
    #[inline]
    pub fn can_be_voided(&self) -> bool {
        self.is_normal() && self.status == SaleStatus::Completed
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// A line item in a sale. Written once together with its sale, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleDetail {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Position of the line within its sale, starting at 1.
    pub line_number: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Units moved. Positive on both normal and void sales.
    pub quantity: i64,
    /// unit_price × quantity.
    pub gross_cents: i64,
    pub discount_cents: i64,
    /// gross − discount.
    pub net_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleDetail {
    #[inline]
    pub fn gross(&self) -> Money {
        Money::from_cents(self.gross_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn net(&self) -> Money {
        Money::from_cents(self.net_cents)
    }
}

/// A sale header together with its line items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleWithDetails {
    pub sale: Sale,
    pub details: Vec<SaleDetail>,
}

// =============================================================================
// Sale Requests
// =============================================================================

/// A candidate sale as submitted by the front desk.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub user_id: String,
    pub payment_method_id: String,
    /// Defaults to the time the sale is recorded.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lines: Vec<NewSaleLine>,
}

/// One requested line of a [`NewSale`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleLine {
    pub product_id: String,
    pub quantity: i64,
    /// Overrides the catalog price when present.
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
    /// Absolute discount on the line; zero when absent.
    #[serde(default)]
    pub discount_cents: Option<i64>,
}

impl NewSaleLine {
    /// Line for `quantity` units at the catalog price, no discount.
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        NewSaleLine {
            product_id: product_id.into(),
            quantity,
            unit_price_cents: None,
            discount_cents: None,
        }
    }

    pub fn with_unit_price(mut self, cents: i64) -> Self {
        self.unit_price_cents = Some(cents);
        self
    }

    pub fn with_discount(mut self, cents: i64) -> Self {
        self.discount_cents = Some(cents);
        self
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(kind: SaleKind, status: SaleStatus) -> Sale {
        let now = Utc::now();
        Sale {
            id: "s-1".to_string(),
            sale_date: now,
            total_cents: 1500,
            total_discount_cents: 0,
            user_id: "u-1".to_string(),
            kind,
            status,
            payment_method_id: "pm-1".to_string(),
            voided_sale_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_be_voided() {
        assert!(sale(SaleKind::Normal, SaleStatus::Completed).can_be_voided());
        assert!(!sale(SaleKind::Normal, SaleStatus::Voided).can_be_voided());
        assert!(!sale(SaleKind::Normal, SaleStatus::Pending).can_be_voided());
        assert!(!sale(SaleKind::Void, SaleStatus::Completed).can_be_voided());
    }

    #[test]
    fn test_sale_kind_predicates() {
        let normal = sale(SaleKind::Normal, SaleStatus::Completed);
        assert!(normal.is_normal());
        assert!(!normal.is_void());

        let void = sale(SaleKind::Void, SaleStatus::Completed);
        assert!(void.is_void());
        assert!(!void.is_normal());
    }

    #[test]
    fn test_sale_detail_money_accessors() {
        let detail = SaleDetail {
            id: "d-1".to_string(),
            sale_id: "s-1".to_string(),
            product_id: "p-1".to_string(),
            line_number: 1,
            unit_price_cents: 1000,
            quantity: 2,
            gross_cents: 2000,
            discount_cents: 300,
            net_cents: 1700,
            created_at: Utc::now(),
        };
        assert_eq!(detail.gross(), Money::from_cents(2000));
        assert_eq!(detail.discount(), Money::from_cents(300));
        assert_eq!(detail.net(), detail.gross() - detail.discount());
    }

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Pending);
    }

    #[test]
    fn test_new_sale_line_defaults_from_json() {
        let line: NewSaleLine =
            serde_json::from_str(r#"{"product_id":"p-1","quantity":3}"#).unwrap();
        assert_eq!(line.quantity, 3);
        assert!(line.unit_price_cents.is_none());
        assert!(line.discount().is_zero());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&SaleKind::Void).unwrap(), "\"void\"");
        assert_eq!(
            serde_json::to_string(&SaleStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethodType::Transfer).unwrap(),
            "\"transfer\""
        );
    }

    #[test]
    fn test_product_stock_check() {
        let now = Utc::now();
        let product = NewProduct {
            name: "  Protein Bar ".to_string(),
            description: None,
            unit_price_cents: 500,
            stock: 10,
            status: ProductStatus::Active,
        }
        .into_product("p-1".to_string(), now);

        assert_eq!(product.name, "Protein Bar");
        assert!(product.is_active());
        assert!(product.has_stock(10));
        assert!(!product.has_stock(11));
        assert_eq!(product.price().cents(), 500);
    }
}
