//! # gym-db: Database Layer for the Gym POS
//!
//! SQLite storage for the product catalog, the payment method registry and
//! the sale ledger, plus the [`SaleEngine`] that owns the create/void
//! transactions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gym POS Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     gym-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  SaleEngine   │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (engine.rs)  │───►│ ProductRepo   │    │  (embedded)  │  │   │
//! │  │   │ create / void │    │ PaymentRepo   │    │ 001_init.sql │  │   │
//! │  │   │ transactions  │    │ SaleRepo      │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │ gym_core::ledger (pure rules)                      │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and engine error types
//! - [`repository`] - Repository implementations
//! - [`engine`] - Transactional sale engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gym_db::{Database, GymConfig};
//!
//! let db = Database::new(GymConfig::from_env()?.db_config()).await?;
//!
//! let sale = db.sale_engine().create_sale(request).await?;
//! let void = db.sale_engine().void_sale(&sale.sale.id, "manager-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, GymConfig};
pub use engine::SaleEngine;
pub use error::{DbError, DbResult, EngineError, EngineResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::{PaymentMethodRepository, ProductRepository, SaleRepository};
