//! # Sale Engine
//!
//! Creates and voids sales atomically: ledger rows and stock move together
//! or not at all.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(NewSale)                                                   │
//! │                                                                         │
//! │  pooled conn (reads only)          transaction (writes only)           │
//! │  ───────────────────────           ─────────────────────────           │
//! │  check request                     INSERT sales                        │
//! │  load + check payment method  ──►  INSERT sale_details (batch)         │
//! │  check lines                       UPDATE products SET stock - Σqty    │
//! │  load + check products               WHERE stock - Σqty >= 0           │
//! │  price, stock pre-check            COMMIT                              │
//! │                                                                         │
//! │  void_sale(id, user)                                                   │
//! │                                                                         │
//! │  load sale + details               UPDATE sales SET status='voided'    │
//! │  check voidable               ──►    WHERE status='completed'          │
//! │  plan void                         INSERT void sale + details          │
//! │                                    UPDATE products SET stock + Σqty    │
//! │                                    COMMIT                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule violation is reported before `BEGIN`. Inside the transaction
//! only the two guarded updates can still fail on a rule (a concurrent sale
//! took the stock, a concurrent void flipped the sale first); the
//! transaction is then dropped, which rolls it back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::repository::{generate_id, payment_method, product, sale, SaleRepository};
use gym_core::{ledger, CoreError, NewSale, Sale, SaleStatus, SaleWithDetails};

/// Orchestrates sale creation and voiding over the catalog, the payment
/// method registry and the sale ledger.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    pool: SqlitePool,
}

impl SaleEngine {
    pub fn new(pool: SqlitePool) -> Self {
        SaleEngine { pool }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Validates, prices and records a sale, taking its quantities out of
    /// stock.
    pub async fn create_sale(&self, request: NewSale) -> EngineResult<SaleWithDetails> {
        debug!(
            user_id = %request.user_id,
            payment_method_id = %request.payment_method_id,
            lines = request.lines.len(),
            "create_sale"
        );

        let result = self.record_sale(&request).await;
        match &result {
            Ok(created) => info!(
                sale_id = %created.sale.id,
                total = %created.sale.total(),
                items = created.details.len(),
                "Sale created"
            ),
            Err(err) => warn!(
                user_id = %request.user_id,
                kind = ?err.kind(),
                error = %err,
                "Sale rejected"
            ),
        }
        result
    }

    async fn record_sale(&self, request: &NewSale) -> EngineResult<SaleWithDetails> {
        ledger::check_request(request)?;

        let mut conn = self.pool.acquire().await?;

        let method_id = request.payment_method_id.trim();
        let method = payment_method::get_by_id(&mut conn, method_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Payment method", method_id))?;
        ledger::ensure_payment_method_active(&method)?;

        ledger::check_lines(&request.lines)?;

        let mut catalog = HashMap::new();
        for product_id in ledger::distinct_product_ids(&request.lines) {
            let product = product::get_by_id(&mut conn, product_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Product", product_id))?;
            ledger::ensure_product_active(&product)?;
            catalog.insert(product.id.clone(), product);
        }

        // Give the connection back before BEGIN
        drop(conn);

        let now = Utc::now();
        let priced = ledger::price_sale(request, &catalog, generate_id, now)?;
        let quantities = ledger::quantities_by_product(&priced.details)?;

        let mut tx = self.pool.begin().await?;

        sale::insert_header(&mut tx, &priced.sale).await?;
        sale::insert_detail_batch(&mut tx, &priced.sale.id, &priced.details).await?;
        for (product_id, quantity) in &quantities {
            let remaining = product::adjust_stock(&mut tx, product_id, -quantity, now).await?;
            debug!(product_id = %product_id, sold = quantity, remaining, "Stock decreased");
        }

        tx.commit().await?;

        Ok(priced)
    }

    // =========================================================================
    // Void
    // =========================================================================

    /// Voids a completed sale on behalf of `user_id`, recording a
    /// compensating void sale and putting the stock back.
    pub async fn void_sale(&self, sale_id: &str, user_id: &str) -> EngineResult<SaleWithDetails> {
        debug!(sale_id = %sale_id, user_id = %user_id, "void_sale");

        let result = self.record_void(sale_id, user_id).await;
        match &result {
            Ok(void) => info!(
                sale_id = %sale_id,
                void_sale_id = %void.sale.id,
                total = %void.sale.total(),
                "Sale voided"
            ),
            Err(err) => warn!(
                sale_id = %sale_id,
                kind = ?err.kind(),
                error = %err,
                "Void rejected"
            ),
        }
        result
    }

    async fn record_void(&self, sale_id: &str, user_id: &str) -> EngineResult<SaleWithDetails> {
        ledger::check_void_request(sale_id, user_id)?;

        let mut conn = self.pool.acquire().await?;

        let original = sale::get_header(&mut conn, sale_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Sale", sale_id))?;
        ledger::ensure_voidable(&original)?;

        let details = sale::get_details(&mut conn, sale_id).await?;
        drop(conn);

        let now = Utc::now();
        let original = SaleWithDetails {
            sale: original,
            details,
        };
        let plan = ledger::plan_void(&original, user_id, generate_id, now)?;

        let mut tx = self.pool.begin().await?;

        let flipped = sale::update_header(&mut tx, &plan.original, SaleStatus::Completed).await?;
        if !flipped {
            return Err(CoreError::SaleCannotBeVoided {
                sale_id: sale_id.to_string(),
                reason: "already voided".to_string(),
            }
            .into());
        }

        sale::insert_header(&mut tx, &plan.void.sale).await?;
        sale::insert_detail_batch(&mut tx, &plan.void.sale.id, &plan.void.details).await?;
        for (product_id, quantity) in &plan.restock {
            let stock = product::adjust_stock(&mut tx, product_id, *quantity, now).await?;
            debug!(product_id = %product_id, restored = quantity, stock, "Stock restored");
        }

        tx.commit().await?;

        Ok(plan.void)
    }

    // =========================================================================
    // Read Side
    // =========================================================================

    /// Gets a sale with its details.
    pub async fn get_sale(&self, sale_id: &str) -> EngineResult<SaleWithDetails> {
        self.sales()
            .get_with_details(sale_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Sale", sale_id).into())
    }

    /// Lists all sale headers, newest first.
    pub async fn list_sales(&self) -> EngineResult<Vec<Sale>> {
        Ok(self.sales().list().await?)
    }

    /// Lists sale headers dated within `[start, end]`, newest first,
    /// optionally for a single user.
    pub async fn list_sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user_id: Option<&str>,
    ) -> EngineResult<Vec<Sale>> {
        if start > end {
            return Err(EngineError::Core(CoreError::InvalidInput(
                "start must not be after end".to_string(),
            )));
        }
        Ok(self.sales().list_between(start, end, user_id).await?)
    }

    fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
