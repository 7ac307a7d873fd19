//! Payment entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::DbId;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    #[serde(rename = "fecha_pago")]
    pub paid_on: NaiveDate,
    #[serde(rename = "medio_pago")]
    pub method: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "id_factura")]
    pub invoice_id: DbId,
}

/// DTO for recording a new payment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayment {
    #[serde(rename = "fecha_pago")]
    pub paid_on: NaiveDate,
    #[serde(rename = "medio_pago")]
    pub method: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "id_factura")]
    pub invoice_id: DbId,
}

/// DTO for updating an existing payment. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePayment {
    #[serde(rename = "fecha_pago")]
    pub paid_on: Option<NaiveDate>,
    #[serde(rename = "medio_pago")]
    pub method: Option<String>,
    #[serde(rename = "monto")]
    pub amount: Option<f64>,
    #[serde(rename = "id_factura")]
    pub invoice_id: Option<DbId>,
}
