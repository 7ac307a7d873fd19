//! Role entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::DbId;

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    #[serde(rename = "rol")]
    pub name: String,
}

/// DTO for creating a new role.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRole {
    #[serde(rename = "rol")]
    pub name: String,
}

/// DTO for updating an existing role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRole {
    #[serde(rename = "rol")]
    pub name: Option<String>,
}
