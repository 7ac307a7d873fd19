//! Ticket entity model, the joined ticket representation, and filters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yard_core::ticket::TicketState;
use yard_core::types::{DbId, Timestamp};

/// A row from the `tickets` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    #[serde(rename = "fecha_hora_entrada")]
    pub entered_at: Timestamp,
    #[serde(rename = "fecha_hora_salida")]
    pub exited_at: Option<Timestamp>,
    #[sqlx(try_from = "String")]
    #[serde(rename = "estado")]
    pub state: TicketState,
    #[serde(rename = "id_ubicacion")]
    pub slot_id: DbId,
    #[serde(rename = "id_usuario")]
    pub user_id: DbId,
    #[serde(rename = "id_contenedor")]
    pub container_id: DbId,
    #[serde(rename = "fecha_modificacion")]
    pub updated_at: Option<Timestamp>,
}

/// Location summary embedded in a ticket representation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SlotInfo {
    #[sqlx(rename = "slot_row")]
    #[serde(rename = "fila")]
    pub row: i32,
    #[sqlx(rename = "slot_column")]
    #[serde(rename = "columna")]
    pub column: i32,
    #[sqlx(rename = "slot_level")]
    #[serde(rename = "nivel")]
    pub level: i32,
    #[serde(rename = "zona_nombre")]
    pub zone_name: String,
    #[serde(rename = "zona_id")]
    pub zone_id: DbId,
}

/// Container summary embedded in a ticket representation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ContainerInfo {
    #[serde(rename = "codigo_barras")]
    pub barcode: Option<String>,
    #[serde(rename = "numero_contenedor")]
    pub container_number: Option<String>,
    #[serde(rename = "tipo")]
    pub container_type: String,
    #[serde(rename = "dimensiones")]
    pub dimensions: String,
    #[serde(rename = "peso")]
    pub weight: f64,
}

/// The ticket representation returned by every ticket endpoint.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TicketDetail {
    pub id: DbId,
    #[serde(rename = "fecha_hora_entrada")]
    pub entered_at: Timestamp,
    #[serde(rename = "fecha_hora_salida")]
    pub exited_at: Option<Timestamp>,
    #[sqlx(try_from = "String")]
    #[serde(rename = "estado")]
    pub state: TicketState,
    #[serde(rename = "id_ubicacion")]
    pub slot_id: DbId,
    #[sqlx(flatten)]
    #[serde(rename = "ubicacion_info")]
    pub slot_info: SlotInfo,
    #[serde(rename = "id_usuario")]
    pub user_id: DbId,
    #[serde(rename = "usuario_nombre")]
    pub user_name: String,
    #[serde(rename = "id_contenedor")]
    pub container_id: DbId,
    #[sqlx(flatten)]
    #[serde(rename = "contenedor_info")]
    pub container_info: ContainerInfo,
    #[serde(rename = "fecha_modificacion")]
    pub updated_at: Option<Timestamp>,
}

/// Input for opening a ticket on an already chosen slot.
///
/// The state is always [`TicketState::INITIAL`] and the exit time unset.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub entered_at: Timestamp,
    pub slot_id: DbId,
    pub user_id: DbId,
    pub container_id: DbId,
}

/// Filters for ticket listings. `None` fields do not restrict the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub state: Option<TicketState>,
    pub user_id: Option<DbId>,
}

impl TicketFilter {
    pub fn by_state(state: TicketState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    pub fn by_user(user_id: DbId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.state.map_or(true, |s| s == ticket.state)
            && self.user_id.map_or(true, |u| u == ticket.user_id)
    }
}

/// Request body for `POST /tickets`.
///
/// Candidate slots come from the first of `candidatos`, `id_ubicacion` or
/// `id_zona` that is present.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    /// Defaults to the time of the request.
    #[serde(rename = "fecha_hora_entrada")]
    pub entered_at: Option<Timestamp>,
    #[serde(rename = "id_usuario")]
    pub user_id: DbId,
    #[serde(rename = "id_contenedor")]
    pub container_id: DbId,
    /// Ordered candidate slots, most preferred first.
    #[serde(rename = "candidatos")]
    pub candidates: Option<Vec<DbId>>,
    #[serde(rename = "id_ubicacion")]
    pub slot_id: Option<DbId>,
    #[serde(rename = "id_zona")]
    pub zone_id: Option<DbId>,
}

/// Query parameters for the ticket listings.
///
/// Kept as raw strings so that a present but empty parameter can be told
/// apart from an absent one.
#[derive(Debug, Default, Deserialize)]
pub struct TicketListParams {
    pub estado: Option<String>,
    pub usuario_id: Option<String>,
}
