//! Invoice entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::types::DbId;

/// A row from the `invoices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    #[serde(rename = "fecha_emision")]
    pub issued_on: NaiveDate,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "id_ticket")]
    pub ticket_id: DbId,
}

/// DTO for issuing a new invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    #[serde(rename = "fecha_emision")]
    pub issued_on: NaiveDate,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "id_ticket")]
    pub ticket_id: DbId,
}

/// DTO for updating an existing invoice. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoice {
    #[serde(rename = "fecha_emision")]
    pub issued_on: Option<NaiveDate>,
    #[serde(rename = "monto")]
    pub amount: Option<f64>,
    #[serde(rename = "estado")]
    pub state: Option<String>,
    #[serde(rename = "id_ticket")]
    pub ticket_id: Option<DbId>,
}
