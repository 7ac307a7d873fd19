//! Zone entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::DbId;

/// A row from the `zones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Zone {
    pub id: DbId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "capacidad")]
    pub capacity: i32,
}

/// DTO for creating a new zone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateZone {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "capacidad")]
    pub capacity: i32,
}

/// DTO for updating an existing zone. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateZone {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "capacidad")]
    pub capacity: Option<i32>,
}

/// Slot counts for one zone, broken down by occupancy state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ZoneOccupancy {
    #[serde(rename = "id_zona")]
    pub zone_id: DbId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "capacidad")]
    pub capacity: i32,
    #[serde(rename = "total_slots")]
    pub total: i64,
    #[serde(rename = "disponibles")]
    pub available: i64,
    #[serde(rename = "ocupados")]
    pub occupied: i64,
    #[serde(rename = "mantenimiento")]
    pub maintenance: i64,
}
