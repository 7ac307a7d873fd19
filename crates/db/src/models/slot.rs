//! Slot entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::slot::SlotState;
use yard_core::types::DbId;

/// A row from the `slots` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Slot {
    pub id: DbId,
    #[sqlx(rename = "slot_row")]
    #[serde(rename = "fila")]
    pub row: i32,
    #[sqlx(rename = "slot_column")]
    #[serde(rename = "columna")]
    pub column: i32,
    #[sqlx(rename = "slot_level")]
    #[serde(rename = "nivel")]
    pub level: i32,
    #[sqlx(try_from = "String")]
    #[serde(rename = "estado")]
    pub state: SlotState,
    #[serde(rename = "id_zona")]
    pub zone_id: DbId,
}

/// DTO for provisioning a new slot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlot {
    #[serde(rename = "fila")]
    pub row: i32,
    #[serde(rename = "columna")]
    pub column: i32,
    #[serde(rename = "nivel")]
    pub level: i32,
    /// Defaults to `Disponible` if omitted.
    #[serde(rename = "estado")]
    pub state: Option<SlotState>,
    #[serde(rename = "id_zona")]
    pub zone_id: DbId,
}

/// DTO for updating an existing slot. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSlot {
    #[serde(rename = "fila")]
    pub row: Option<i32>,
    #[serde(rename = "columna")]
    pub column: Option<i32>,
    #[serde(rename = "nivel")]
    pub level: Option<i32>,
    #[serde(rename = "estado")]
    pub state: Option<SlotState>,
    #[serde(rename = "id_zona")]
    pub zone_id: Option<DbId>,
}

impl UpdateSlot {
    /// Whether applying the update would change the slot's position.
    pub fn moves(&self, current: &Slot) -> bool {
        self.row.is_some_and(|row| row != current.row)
            || self.column.is_some_and(|column| column != current.column)
            || self.level.is_some_and(|level| level != current.level)
            || self.zone_id.is_some_and(|zone| zone != current.zone_id)
    }
}

/// Query parameters for `GET /slots`.
#[derive(Debug, Deserialize)]
pub struct SlotListParams {
    pub id_zona: Option<DbId>,
    pub estado: Option<String>,
}
