//! Repository for the `vessels` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::vessel::{CreateVessel, UpdateVessel, Vessel};

const COLUMNS: &str = "id, name, shipping_line";

/// Provides CRUD operations for vessels.
pub struct VesselRepo;

impl VesselRepo {
    pub async fn create(pool: &PgPool, input: &CreateVessel) -> Result<Vessel, sqlx::Error> {
        let query = format!(
            "INSERT INTO vessels (name, shipping_line) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vessel>(&query)
            .bind(&input.name)
            .bind(&input.shipping_line)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vessel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vessels WHERE id = $1");
        sqlx::query_as::<_, Vessel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Vessel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vessels WHERE name = $1");
        sqlx::query_as::<_, Vessel>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Vessel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vessels ORDER BY id");
        sqlx::query_as::<_, Vessel>(&query).fetch_all(pool).await
    }

    /// Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVessel,
    ) -> Result<Option<Vessel>, sqlx::Error> {
        let query = format!(
            "UPDATE vessels SET
                name = COALESCE($2, name),
                shipping_line = COALESCE($3, shipping_line)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vessel>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.shipping_line)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vessels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
