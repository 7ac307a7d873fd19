//! Repository for the `payments` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::payment::{CreatePayment, Payment, UpdatePayment};

const COLUMNS: &str = "id, paid_on, method, amount, invoice_id";

/// Provides CRUD operations for payments against invoices.
pub struct PaymentRepo;

impl PaymentRepo {
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (paid_on, method, amount, invoice_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.paid_on)
            .bind(&input.method)
            .bind(input.amount)
            .bind(input.invoice_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments ORDER BY paid_on DESC, id DESC");
        sqlx::query_as::<_, Payment>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET
                paid_on = COALESCE($2, paid_on),
                method = COALESCE($3, method),
                amount = COALESCE($4, amount),
                invoice_id = COALESCE($5, invoice_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(input.paid_on)
            .bind(&input.method)
            .bind(input.amount)
            .bind(input.invoice_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
