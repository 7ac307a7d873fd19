//! Container entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::DbId;

/// A container row joined with its vessel's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Container {
    pub id: DbId,
    #[serde(rename = "codigo_barras")]
    pub barcode: Option<String>,
    #[serde(rename = "numero_contenedor")]
    pub container_number: Option<String>,
    #[serde(rename = "dimensiones")]
    pub dimensions: String,
    #[serde(rename = "tipo")]
    pub container_type: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "id_buque")]
    pub vessel_id: DbId,
    #[serde(rename = "buque_nombre")]
    pub vessel_name: String,
    #[serde(rename = "id_cita_recojo")]
    pub appointment_id: Option<DbId>,
}

/// DTO for registering a new container.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContainer {
    #[serde(rename = "codigo_barras")]
    pub barcode: Option<String>,
    #[serde(rename = "numero_contenedor")]
    pub container_number: Option<String>,
    #[serde(rename = "dimensiones")]
    pub dimensions: String,
    #[serde(rename = "tipo")]
    pub container_type: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "id_buque")]
    pub vessel_id: DbId,
    #[serde(rename = "id_cita_recojo")]
    pub appointment_id: Option<DbId>,
}

/// DTO for updating an existing container. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContainer {
    #[serde(rename = "codigo_barras")]
    pub barcode: Option<String>,
    #[serde(rename = "numero_contenedor")]
    pub container_number: Option<String>,
    #[serde(rename = "dimensiones")]
    pub dimensions: Option<String>,
    #[serde(rename = "tipo")]
    pub container_type: Option<String>,
    #[serde(rename = "peso")]
    pub weight: Option<f64>,
    #[serde(rename = "id_buque")]
    pub vessel_id: Option<DbId>,
    #[serde(rename = "id_cita_recojo")]
    pub appointment_id: Option<DbId>,
}
