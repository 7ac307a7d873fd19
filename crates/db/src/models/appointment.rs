//! Pickup appointment entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::{DbId, Timestamp};

/// Default state of a freshly booked appointment.
pub const DEFAULT_APPOINTMENT_STATE: &str = "reservada";

/// An appointment row joined with its client's name and email.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    #[serde(rename = "fecha_envio")]
    pub shipped_on: Option<NaiveDate>,
    #[serde(rename = "fecha_recojo")]
    pub pickup_on: Option<NaiveDate>,
    #[serde(rename = "duracion_viaje_dias")]
    pub travel_days: i32,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "id_cliente")]
    pub client_id: Option<DbId>,
    #[serde(rename = "cliente_nombre")]
    pub client_name: Option<String>,
    #[serde(rename = "cliente_email")]
    pub client_email: Option<String>,
    #[serde(rename = "fecha_creacion")]
    pub created_at: Timestamp,
}

/// DTO for booking a new appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointment {
    #[serde(rename = "fecha_envio")]
    pub shipped_on: Option<NaiveDate>,
    #[serde(rename = "fecha_recojo")]
    pub pickup_on: Option<NaiveDate>,
    #[serde(rename = "duracion_viaje_dias")]
    pub travel_days: Option<i32>,
    /// Defaults to `reservada` if omitted.
    #[serde(rename = "estado")]
    pub state: Option<String>,
    #[serde(rename = "id_cliente")]
    pub client_id: Option<DbId>,
}

/// DTO for updating an existing appointment. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointment {
    #[serde(rename = "fecha_envio")]
    pub shipped_on: Option<NaiveDate>,
    #[serde(rename = "fecha_recojo")]
    pub pickup_on: Option<NaiveDate>,
    #[serde(rename = "duracion_viaje_dias")]
    pub travel_days: Option<i32>,
    #[serde(rename = "estado")]
    pub state: Option<String>,
    #[serde(rename = "id_cliente")]
    pub client_id: Option<DbId>,
}
