//! Repository for the `access_levels` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::access_level::{AccessLevel, CreateAccessLevel, UpdateAccessLevel};

const COLUMNS: &str = "id, name";

/// Provides CRUD operations for user access_levels.
pub struct AccessLevelRepo;

impl AccessLevelRepo {
    pub async fn create(pool: &PgPool, input: &CreateAccessLevel) -> Result<AccessLevel, sqlx::Error> {
        let query = format!("INSERT INTO access_levels (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, AccessLevel>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AccessLevel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM access_levels WHERE id = $1");
        sqlx::query_as::<_, AccessLevel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive lookup by level name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<AccessLevel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM access_levels WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, AccessLevel>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<AccessLevel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM access_levels ORDER BY id");
        sqlx::query_as::<_, AccessLevel>(&query).fetch_all(pool).await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAccessLevel,
    ) -> Result<Option<AccessLevel>, sqlx::Error> {
        let query = format!(
            "UPDATE access_levels SET name = COALESCE($2, name) WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessLevel>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_levels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
