//! Access level entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::DbId;

/// A row from the `access_levels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessLevel {
    pub id: DbId,
    #[serde(rename = "nivel")]
    pub name: String,
}

/// DTO for creating a new access level.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccessLevel {
    #[serde(rename = "nivel")]
    pub name: String,
}

/// DTO for updating an existing access level.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccessLevel {
    #[serde(rename = "nivel")]
    pub name: Option<String>,
}
