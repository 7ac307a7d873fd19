//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub role_id: DbId,
    pub access_level_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash), with the
/// role and access level names resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "empresa")]
    pub company: Option<String>,
    #[serde(rename = "id_rol")]
    pub role_id: DbId,
    #[serde(rename = "rol_nombre")]
    pub role_name: String,
    #[serde(rename = "id_nivel_acceso")]
    pub access_level_id: DbId,
    #[serde(rename = "nivel_nombre")]
    pub access_level_name: String,
    #[serde(rename = "fecha_modificacion")]
    pub updated_at: Timestamp,
    #[serde(rename = "fecha_creacion")]
    pub created_at: Timestamp,
    #[serde(rename = "activo")]
    pub is_active: bool,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub role_id: DbId,
    pub access_level_id: DbId,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub role_id: Option<DbId>,
    pub access_level_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /usuarios/by_role`.
#[derive(Debug, Deserialize)]
pub struct RoleFilterParams {
    pub role: Option<String>,
}
