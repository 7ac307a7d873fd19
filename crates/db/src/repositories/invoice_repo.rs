//! Repository for the `invoices` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::invoice::{CreateInvoice, Invoice, UpdateInvoice};

const COLUMNS: &str = "id, issued_on, amount, state, ticket_id";

/// Provides CRUD operations for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    pub async fn create(pool: &PgPool, input: &CreateInvoice) -> Result<Invoice, sqlx::Error> {
        let query = format!(
            "INSERT INTO invoices (issued_on, amount, state, ticket_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(input.issued_on)
            .bind(input.amount)
            .bind(&input.state)
            .bind(input.ticket_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices WHERE id = $1");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices ORDER BY issued_on DESC, id DESC");
        sqlx::query_as::<_, Invoice>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET
                issued_on = COALESCE($2, issued_on),
                amount = COALESCE($3, amount),
                state = COALESCE($4, state),
                ticket_id = COALESCE($5, ticket_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(input.issued_on)
            .bind(input.amount)
            .bind(&input.state)
            .bind(input.ticket_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
