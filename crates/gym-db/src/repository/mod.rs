//! # Repository Module
//!
//! Database repository implementations for the Gym POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Ways In                                          │
//! │                                                                         │
//! │  Back office / read side          SaleEngine (inside a transaction)    │
//! │       │                                 │                               │
//! │       │  db.products().search(..)       │  product::adjust_stock(      │
//! │       ▼                                 ▼      &mut tx, id, -3, now)   │
//! │  ProductRepository ──────────► free functions on &mut SqliteConnection │
//! │  (acquires a pooled conn)              │                               │
//! │                                         ▼                               │
//! │                                  SQLite Database                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product catalog and stock
//! - [`PaymentMethodRepository`] - Payment method registry
//! - [`SaleRepository`] - Sale headers and details

pub mod payment_method;
pub mod product;
pub mod sale;

pub use payment_method::PaymentMethodRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;

use uuid::Uuid;

/// Generates a new row id (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
