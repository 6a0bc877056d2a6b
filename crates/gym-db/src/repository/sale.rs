//! # Sale Repository
//!
//! Storage for sale headers and their line details.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (one transaction, see SaleEngine)                           │
//! │     └── insert_header()        → Sale { kind: normal, completed }      │
//! │     └── insert_detail_batch()  → SaleDetail × n                        │
//! │                                                                         │
//! │  2. (OPTIONAL) VOID (one transaction)                                  │
//! │     └── update_header(expected = completed) → original is voided       │
//! │     └── insert_header()        → Sale { kind: void, completed }        │
//! │     └── insert_detail_batch()  → negated SaleDetail × n                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Details are written once and never updated.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use gym_core::{Sale, SaleDetail, SaleStatus, SaleWithDetails};

const SALE_COLUMNS: &str = "id, sale_date, total_cents, total_discount_cents, user_id, \
     kind, status, payment_method_id, voided_sale_id, created_at, updated_at";

const DETAIL_COLUMNS: &str = "id, sale_id, product_id, line_number, unit_price_cents, \
     quantity, gross_cents, discount_cents, net_cents, created_at";

/// SQLite's default cap on bound parameters per statement.
const SQLITE_MAX_VARIABLES: usize = 32766;

/// Bound values per detail row (one per `DETAIL_COLUMNS` entry).
const DETAIL_BINDS_PER_ROW: usize = 10;

/// Most detail rows one INSERT can carry.
pub const DETAIL_ROWS_PER_INSERT: usize = SQLITE_MAX_VARIABLES / DETAIL_BINDS_PER_ROW;

/// Repository for sale database operations.
///
/// Writes go through [`crate::SaleEngine`]; this handle covers lookups.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by ID.
    pub async fn get_header(&self, id: &str) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        get_header(&mut conn, id).await
    }

    /// Gets the details of a sale, in line order.
    pub async fn get_details(&self, sale_id: &str) -> DbResult<Vec<SaleDetail>> {
        let mut conn = self.pool.acquire().await?;
        get_details(&mut conn, sale_id).await
    }

    /// Gets a sale together with its details.
    pub async fn get_with_details(&self, id: &str) -> DbResult<Option<SaleWithDetails>> {
        let mut conn = self.pool.acquire().await?;
        let Some(sale) = get_header(&mut conn, id).await? else {
            return Ok(None);
        };
        let details = get_details(&mut conn, id).await?;
        Ok(Some(SaleWithDetails { sale, details }))
    }

    /// Lists every sale header, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date DESC, created_at DESC"
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists sale headers with `start <= sale_date <= end`, newest first,
    /// optionally for one user only.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user_id: Option<&str>,
    ) -> DbResult<Vec<Sale>> {
        debug!(%start, %end, user_id = ?user_id, "Listing sales in range");

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE sale_date >= ?1 AND sale_date <= ?2 \
               AND (?3 IS NULL OR user_id = ?3) \
             ORDER BY sale_date DESC, created_at DESC"
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(start)
            .bind(end)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }
}

// =============================================================================
// Connection-level Operations
// =============================================================================

/// Inserts a sale header.
pub async fn insert_header(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    debug!(id = %sale.id, kind = ?sale.kind, total_cents = sale.total_cents, "Inserting sale header");

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, sale_date, total_cents, total_discount_cents, user_id,
            kind, status, payment_method_id, voided_sale_id,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&sale.id)
    .bind(sale.sale_date)
    .bind(sale.total_cents)
    .bind(sale.total_discount_cents)
    .bind(&sale.user_id)
    .bind(sale.kind)
    .bind(sale.status)
    .bind(&sale.payment_method_id)
    .bind(&sale.voided_sale_id)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Writes the status of `sale`, but only while the stored row still has
/// `expected` status.
///
/// Returns `false` when no row matched: the sale is gone or another request
/// moved it on first.
pub async fn update_header(
    conn: &mut SqliteConnection,
    sale: &Sale,
    expected: SaleStatus,
) -> DbResult<bool> {
    debug!(id = %sale.id, from = ?expected, to = ?sale.status, "Updating sale header");

    let result = sqlx::query(
        r#"
        UPDATE sales
        SET status = ?2, updated_at = ?3
        WHERE id = ?1 AND status = ?4
        "#,
    )
    .bind(&sale.id)
    .bind(sale.status)
    .bind(sale.updated_at)
    .bind(expected)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Inserts all details of a sale, [`DETAIL_ROWS_PER_INSERT`] rows per
/// statement, on the caller's connection (and so inside its transaction).
pub async fn insert_detail_batch(
    conn: &mut SqliteConnection,
    sale_id: &str,
    details: &[SaleDetail],
) -> DbResult<()> {
    if details.is_empty() {
        return Ok(());
    }

    debug!(sale_id = %sale_id, count = details.len(), "Inserting sale details");

    for chunk in details.chunks(DETAIL_ROWS_PER_INSERT) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("INSERT INTO sale_details ({DETAIL_COLUMNS}) "));

        builder.push_values(chunk, |mut row, detail| {
            row.push_bind(detail.id.clone())
                .push_bind(sale_id.to_string())
                .push_bind(detail.product_id.clone())
                .push_bind(detail.line_number)
                .push_bind(detail.unit_price_cents)
                .push_bind(detail.quantity)
                .push_bind(detail.gross_cents)
                .push_bind(detail.discount_cents)
                .push_bind(detail.net_cents)
                .push_bind(detail.created_at);
        });

        builder.build().execute(&mut *conn).await?;
    }

    Ok(())
}

pub async fn get_header(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

    let sale = sqlx::query_as::<_, Sale>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(sale)
}

pub async fn get_details(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SaleDetail>> {
    let sql = format!(
        "SELECT {DETAIL_COLUMNS} FROM sale_details WHERE sale_id = ?1 ORDER BY line_number"
    );

    let details = sqlx::query_as::<_, SaleDetail>(&sql)
        .bind(sale_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(details)
}

// =============================================================================
// Unit Tests
// =============================================================================
