//! Handlers for the `/tickets` resource.
//!
//! Tickets are opened through the slot allocator and change only through
//! `cambiar_estado`; there is no update or delete.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use yard_core::error::CoreError;
use yard_core::ticket::TicketState;
use yard_core::types::DbId;
use yard_db::models::ticket::{CreateTicket, TicketDetail, TicketFilter, TicketListParams};

use crate::engine::TicketEntry;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Parameter parsing
// ---------------------------------------------------------------------------

fn required<'a>(value: Option<&'a str>, name: &str) -> AppResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Query parameter '{name}' is required")))
}

fn parse_user_id(raw: &str) -> AppResult<DbId> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid usuario_id '{raw}'")))
}

/// Build a listing filter. Absent parameters do not filter; a parameter
/// that is present but blank is rejected.
fn filter_from_params(params: &TicketListParams) -> AppResult<TicketFilter> {
    let state = match params.estado.as_deref() {
        Some(raw) => Some(TicketState::parse(required(Some(raw), "estado")?)?),
        None => None,
    };
    let user_id = match params.usuario_id.as_deref() {
        Some(raw) => Some(parse_user_id(required(Some(raw), "usuario_id")?)?),
        None => None,
    };
    Ok(TicketFilter { state, user_id })
}

/// Pull the `estado` field out of a state-change body.
///
/// An empty body, a body that is not a JSON object, and a missing, null or
/// non-string `estado` all yield `None`.
fn requested_state(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("estado")?.as_str().map(str::to_string)
}

// ---------------------------------------------------------------------------
// Opening tickets
// ---------------------------------------------------------------------------

/// POST /api/tickets
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTicket>,
) -> AppResult<(StatusCode, Json<TicketDetail>)> {
    let entry = TicketEntry {
        entered_at: input.entered_at.unwrap_or_else(Utc::now),
        user_id: input.user_id,
        container_id: input.container_id,
    };

    let ticket = if let Some(candidates) = &input.candidates {
        state.allocator.allocate(&entry, candidates).await?
    } else if let Some(slot_id) = input.slot_id {
        state.allocator.allocate(&entry, &[slot_id]).await?
    } else if let Some(zone_id) = input.zone_id {
        state.allocator.allocate_in_zone(&entry, zone_id).await?
    } else {
        return Err(AppError::Core(CoreError::Validation(
            "One of 'candidatos', 'id_ubicacion' or 'id_zona' is required".into(),
        )));
    };

    let detail = state.lifecycle.find(ticket.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/tickets?estado=&usuario_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<Json<Vec<TicketDetail>>> {
    let filter = filter_from_params(&params)?;
    Ok(Json(state.lifecycle.list(&filter).await?))
}

/// GET /api/tickets/by_estado?estado=
pub async fn by_state(
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<Json<Vec<TicketDetail>>> {
    let ticket_state = TicketState::parse(required(params.estado.as_deref(), "estado")?)?;
    Ok(Json(state.lifecycle.list_by_state(ticket_state).await?))
}

/// GET /api/tickets/by_usuario?usuario_id=
pub async fn by_user(
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<Json<Vec<TicketDetail>>> {
    let user_id = parse_user_id(required(params.usuario_id.as_deref(), "usuario_id")?)?;
    Ok(Json(state.lifecycle.list_by_user(user_id).await?))
}

/// GET /api/tickets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TicketDetail>> {
    Ok(Json(state.lifecycle.find(id).await?))
}

// ---------------------------------------------------------------------------
// State changes
// ---------------------------------------------------------------------------

/// PATCH /api/tickets/{id}/cambiar_estado
///
/// Body: `{"estado": "<state>"}`. The body is read raw so that an empty or
/// malformed one is reported as a missing `estado`.
pub async fn change_state(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    body: Bytes,
) -> AppResult<Json<TicketDetail>> {
    let requested = requested_state(&body);
    let detail = state
        .lifecycle
        .change_state(id, requested.as_deref())
        .await?;
    Ok(Json(detail))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn params(estado: Option<&str>, usuario_id: Option<&str>) -> TicketListParams {
        TicketListParams {
            estado: estado.map(str::to_string),
            usuario_id: usuario_id.map(str::to_string),
        }
    }

    #[test]
    fn absent_filters_match_everything() {
        assert_eq!(
            filter_from_params(&params(None, None)).unwrap(),
            TicketFilter::default()
        );
    }

    #[test]
    fn present_filters_are_parsed() {
        let filter = filter_from_params(&params(Some("en_proceso"), Some("12"))).unwrap();
        assert_eq!(filter.state, Some(TicketState::InProgress));
        assert_eq!(filter.user_id, Some(12));
    }

    #[test]
    fn blank_or_malformed_filters_are_rejected() {
        assert_matches!(
            filter_from_params(&params(Some(""), None)),
            Err(AppError::BadRequest(_))
        );
        assert_matches!(
            filter_from_params(&params(None, Some("abc"))),
            Err(AppError::BadRequest(_))
        );
        assert_matches!(
            filter_from_params(&params(Some("Archivado"), None)),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn state_is_read_from_json_bodies_only() {
        assert_eq!(
            requested_state(br#"{"estado": "Validado"}"#).as_deref(),
            Some("Validado")
        );
        assert_eq!(requested_state(b""), None);
        assert_eq!(requested_state(b"estado=Validado"), None);
        assert_eq!(requested_state(br#"{"estado": null}"#), None);
        assert_eq!(requested_state(br#"{"otro": "Validado"}"#), None);
    }
}
