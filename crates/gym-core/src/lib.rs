//! # gym-core: Pure Business Logic for the Gym POS
//!
//! Domain types and the rules of the front-desk sale ledger, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Gym POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 HTTP layer (outside this workspace)             │   │
//! │  │        POST /sales, POST /sales/{id}/void, GET /sales           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 gym-db SaleEngine (transactions)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ gym-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ price_sale│  │   names   │  │   │
//! │  │   │   Sale    │  │   cents   │  │ plan_void │  │  prices   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, PaymentMethod, Sale, SaleDetail)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types and error kinds
//! - [`validation`] - Catalog field validation
//! - [`ledger`] - Sale pricing and void planning
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use chrono::Utc;
//! use gym_core::{ledger, NewSale, NewSaleLine, Product, ProductStatus};
//!
//! let now = Utc::now();
//! let bar = Product {
//!     id: "bar".to_string(),
//!     name: "Protein Bar".to_string(),
//!     description: None,
//!     unit_price_cents: 500,
//!     stock: 10,
//!     status: ProductStatus::Active,
//!     created_at: now,
//!     updated_at: now,
//! };
//! let catalog = HashMap::from([(bar.id.clone(), bar)]);
//!
//! let request = NewSale {
//!     user_id: "front-desk".to_string(),
//!     payment_method_id: "cash".to_string(),
//!     sale_date: None,
//!     lines: vec![NewSaleLine::new("bar", 3)],
//! };
//!
//! let mut n = 0;
//! let sale = ledger::price_sale(&request, &catalog, || { n += 1; n.to_string() }, now).unwrap();
//! assert_eq!(sale.sale.total_cents, 1500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use ledger::VoidPlan;
pub use money::Money;
pub use types::*;
