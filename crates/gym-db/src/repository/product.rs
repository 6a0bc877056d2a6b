//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD and substring search
//! - Guarded stock adjustment (used by the sale engine inside its transaction)
//!
//! ## Stock Adjustment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ WRONG: read, compute, write back                                │
//! │     SELECT stock → 10;  UPDATE products SET stock = 7               │
//! │     (a concurrent sale in between is silently overwritten)         │
//! │                                                                     │
//! │  ✅ CORRECT: delta with a floor, in one statement                  │
//! │     UPDATE products SET stock = stock + ?2                          │
//! │     WHERE id = ?1 AND stock + ?2 >= 0                               │
//! │                                                                     │
//! │  No row back ⇒ unknown product or not enough stock, and the        │
//! │  caller's transaction is dropped (rolled back).                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Functions taking a `&mut SqliteConnection` work on a pooled connection
//! or on an open transaction alike.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use gym_core::validation::{validate_name, validate_price_cents};
use gym_core::{validation, NewProduct, Product, ProductStatus};

const PRODUCT_COLUMNS: &str =
    "id, name, description, unit_price_cents, stock, status, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let bar = repo.insert(NewProduct { name: "Protein Bar".into(), .. }).await?;
/// let found = repo.search("protein", 20).await?;
/// repo.adjust_stock(&bar.id, 24).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Validates and inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id and timestamps
    /// * `Err(DbError::Validation)` - Blank/long name, negative price or stock
    pub async fn insert(&self, new_product: NewProduct) -> DbResult<Product> {
        validation::validate_new_product(&new_product)?;

        let product = new_product.into_product(generate_id(), Utc::now());
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, unit_price_cents, stock,
                status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price_cents)
        .bind(product.stock)
        .bind(product.status)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        get_by_id(&mut conn, id).await
    }

    /// Lists products ordered by name, optionally filtered by status.
    pub async fn list(&self, status: Option<ProductStatus>) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE (?1 IS NULL OR status = ?1) \
             ORDER BY name"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Searches products whose name or description contains `term`.
    ///
    /// An empty term lists active products instead.
    pub async fn search(&self, term: &str, limit: u32) -> DbResult<Vec<Product>> {
        let term = term.trim();

        debug!(term = %term, limit = %limit, "Searching products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE (?1 = '' AND status = 'active') \
                OR (?1 <> '' AND (name LIKE '%' || ?1 || '%' \
                                  OR description LIKE '%' || ?1 || '%')) \
             ORDER BY name \
             LIMIT ?2"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(term)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Updates name, description, price and status of an existing product.
    ///
    /// Stock is not touched here; use [`Self::adjust_stock`].
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, "Updating product");

        validate_name("name", &product.name)?;
        validate_price_cents(product.unit_price_cents)?;

        let sql = format!(
            "UPDATE products SET \
                name = ?2, description = ?3, unit_price_cents = ?4, \
                status = ?5, updated_at = ?6 \
             WHERE id = ?1 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(&product.id)
            .bind(product.name.trim())
            .bind(&product.description)
            .bind(product.unit_price_cents)
            .bind(product.status)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &product.id))
    }

    /// Manually adjusts stock by `delta` (restock, shrinkage, recount).
    ///
    /// ## Returns
    /// * `Ok(i64)` - The new stock level
    /// * `Err(DbError::StockUnderflow)` - Stock would go below zero
    /// * `Err(DbError::NotFound)` - Unknown product
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        adjust_stock(&mut conn, id, delta, Utc::now()).await
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level Operations
// =============================================================================

/// Gets a product by id on the given connection.
pub async fn get_by_id(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(product)
}

/// Adds `delta` to a product's stock unless that would take it below zero.
///
/// Returns the new stock level.
pub async fn adjust_stock(
    conn: &mut SqliteConnection,
    id: &str,
    delta: i64,
    now: DateTime<Utc>,
) -> DbResult<i64> {
    debug!(id = %id, delta = %delta, "Adjusting stock");

    let updated: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE products
        SET stock = stock + ?2, updated_at = ?3
        WHERE id = ?1 AND stock + ?2 >= 0
        RETURNING stock
        "#,
    )
    .bind(id)
    .bind(delta)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(stock) = updated {
        return Ok(stock);
    }

    let available: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match available {
        Some(available) => Err(DbError::StockUnderflow {
            product_id: id.to_string(),
            available,
            delta,
        }),
        None => Err(DbError::not_found("Product", id)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> ProductRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
    }

    fn new_product(name: &str, price: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: Some(format!("{name} for the gym shop")),
            unit_price_cents: price,
            stock,
            status: ProductStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = setup().await;
        let inserted = repo.insert(new_product("Protein Bar", 500, 10)).await.unwrap();

        let found = repo.get_by_id(&inserted.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Protein Bar");
        assert_eq!(found.unit_price_cents, 500);
        assert_eq!(found.stock, 10);
        assert_eq!(found.status, ProductStatus::Active);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_product() {
        let repo = setup().await;

        let err = repo.insert(new_product("  ", 500, 10)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo.insert(new_product("Towel", -1, 10)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_and_search() {
        let repo = setup().await;
        repo.insert(new_product("Whey Protein", 3999, 5)).await.unwrap();
        repo.insert(new_product("Protein Bar", 500, 10)).await.unwrap();
        let mut towel = repo.insert(new_product("Gym Towel", 1200, 3)).await.unwrap();
        towel.status = ProductStatus::Inactive;
        repo.update(&towel).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 3);
        assert_eq!(repo.list(Some(ProductStatus::Inactive)).await.unwrap().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);

        let hits = repo.search("protein", 20).await.unwrap();
        let names: Vec<_> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Protein Bar", "Whey Protein"]);

        // Description matches too
        assert_eq!(repo.search("gym shop", 20).await.unwrap().len(), 3);

        // Empty term lists active products only
        assert_eq!(repo.search("", 20).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let repo = setup().await;
        let mut product = repo.insert(new_product("Shaker", 899, 4)).await.unwrap();
        product.id = "missing".to_string();

        let err = repo.update(&product).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_adjust_stock_guards_floor() {
        let repo = setup().await;
        let product = repo.insert(new_product("Energy Drink", 299, 5)).await.unwrap();

        assert_eq!(repo.adjust_stock(&product.id, -5).await.unwrap(), 0);
        assert_eq!(repo.adjust_stock(&product.id, 12).await.unwrap(), 12);

        let err = repo.adjust_stock(&product.id, -13).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::StockUnderflow {
                available: 12,
                delta: -13,
                ..
            }
        ));
        let stock = repo.get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 12);

        let err = repo.adjust_stock("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
