//! Vessel entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::DbId;

/// A row from the `vessels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vessel {
    pub id: DbId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "linea_naviera")]
    pub shipping_line: String,
}

/// DTO for creating a new vessel.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVessel {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "linea_naviera")]
    pub shipping_line: String,
}

/// DTO for updating an existing vessel. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVessel {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "linea_naviera")]
    pub shipping_line: Option<String>,
}
