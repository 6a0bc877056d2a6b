//! # Payment Method Repository
//!
//! The registry of payment methods a sale can be settled with. The sale
//! engine only reads from it; maintenance happens through the back office.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use gym_core::validation::validate_name;
use gym_core::{PaymentMethod, PaymentMethodStatus, PaymentMethodType};

const PAYMENT_METHOD_COLUMNS: &str = "id, name, method_type, status, created_at, updated_at";

/// Repository for payment method database operations.
#[derive(Debug, Clone)]
pub struct PaymentMethodRepository {
    pool: SqlitePool,
}

impl PaymentMethodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PaymentMethodRepository { pool }
    }

    /// Registers a new, active payment method.
    pub async fn insert(&self, name: &str, method_type: PaymentMethodType) -> DbResult<PaymentMethod> {
        validate_name("name", name)?;

        let now = Utc::now();
        let method = PaymentMethod {
            id: generate_id(),
            name: name.trim().to_string(),
            method_type,
            status: PaymentMethodStatus::Active,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %method.id, name = %method.name, "Inserting payment method");

        sqlx::query(
            r#"
            INSERT INTO payment_methods (id, name, method_type, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&method.id)
        .bind(&method.name)
        .bind(method.method_type)
        .bind(method.status)
        .bind(method.created_at)
        .bind(method.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(method)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PaymentMethod>> {
        let mut conn = self.pool.acquire().await?;
        get_by_id(&mut conn, id).await
    }

    /// Lists payment methods by name, optionally filtered by status.
    pub async fn list(&self, status: Option<PaymentMethodStatus>) -> DbResult<Vec<PaymentMethod>> {
        let sql = format!(
            "SELECT {PAYMENT_METHOD_COLUMNS} FROM payment_methods \
             WHERE (?1 IS NULL OR status = ?1) \
             ORDER BY name"
        );

        let methods = sqlx::query_as::<_, PaymentMethod>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(methods)
    }

    /// Updates name, type and status.
    pub async fn update(&self, method: &PaymentMethod) -> DbResult<PaymentMethod> {
        debug!(id = %method.id, "Updating payment method");

        validate_name("name", &method.name)?;

        let sql = format!(
            "UPDATE payment_methods SET \
                name = ?2, method_type = ?3, status = ?4, updated_at = ?5 \
             WHERE id = ?1 \
             RETURNING {PAYMENT_METHOD_COLUMNS}"
        );

        sqlx::query_as::<_, PaymentMethod>(&sql)
            .bind(&method.id)
            .bind(method.name.trim())
            .bind(method.method_type)
            .bind(method.status)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Payment method", &method.id))
    }
}

/// Gets a payment method by id on the given connection.
pub async fn get_by_id(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<PaymentMethod>> {
    let sql = format!("SELECT {PAYMENT_METHOD_COLUMNS} FROM payment_methods WHERE id = ?1");

    let method = sqlx::query_as::<_, PaymentMethod>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_list_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.payment_methods();

        let cash = repo.insert("Cash", PaymentMethodType::Cash).await.unwrap();
        repo.insert("Card", PaymentMethodType::Card).await.unwrap();

        let found = repo.get_by_id(&cash.id).await.unwrap().unwrap();
        assert_eq!(found.method_type, PaymentMethodType::Cash);
        assert!(found.is_active());

        let mut disabled = found.clone();
        disabled.status = PaymentMethodStatus::Inactive;
        let updated = repo.update(&disabled).await.unwrap();
        assert_eq!(updated.status, PaymentMethodStatus::Inactive);

        let active = repo.list(Some(PaymentMethodStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Card");
        assert_eq!(repo.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_name_required() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .payment_methods()
            .insert("", PaymentMethodType::Transfer)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
