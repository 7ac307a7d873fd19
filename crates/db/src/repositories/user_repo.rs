//! Repository for the `users` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User, UserResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, phone, company, role_id, \
                       access_level_id, is_active, created_at, updated_at";

/// Select list for [`UserResponse`], joined with role and access level names.
const RESPONSE_SELECT: &str = "SELECT u.id, u.name, u.email, u.phone, u.company, \
        u.role_id, r.name AS role_name, u.access_level_id, a.name AS access_level_name, \
        u.updated_at, u.created_at, u.is_active \
     FROM users u \
     JOIN roles r ON r.id = u.role_id \
     JOIN access_levels a ON a.id = u.access_level_id";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, phone, company, role_id, \
                                access_level_id, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(input.role_id)
            .bind(input.access_level_id)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_response_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!("{RESPONSE_SELECT} WHERE u.id = $1");
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_responses(pool: &PgPool) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = format!("{RESPONSE_SELECT} ORDER BY u.id");
        sqlx::query_as::<_, UserResponse>(&query)
            .fetch_all(pool)
            .await
    }

    /// Active users whose role name matches `role` (case-insensitive).
    pub async fn list_active_by_role(
        pool: &PgPool,
        role: &str,
    ) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = format!(
            "{RESPONSE_SELECT} WHERE LOWER(r.name) = LOWER($1) AND u.is_active ORDER BY u.id"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(role)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateUser) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                phone = COALESCE($5, phone),
                company = COALESCE($6, company),
                role_id = COALESCE($7, role_id),
                access_level_id = COALESCE($8, access_level_id),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.phone)
        .bind(&input.company)
        .bind(input.role_id)
        .bind(input.access_level_id)
        .bind(input.is_active)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
