//! Handlers for the `/slots` resource.
//!
//! Slot occupancy follows tickets. `POST` only provisions free or
//! maintenance slots, and a state edit through `PUT`/`PATCH` is refused
//! while a ticket holds the slot.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::slot::{validate_initial_state, SlotState};
use yard_core::types::DbId;
use yard_db::models::slot::{CreateSlot, Slot, SlotListParams, UpdateSlot};
use yard_db::repositories::SlotRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Slot", id })
}

/// POST /api/slots
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateSlot>,
) -> AppResult<(StatusCode, Json<Slot>)> {
    validate_initial_state(input.state.unwrap_or(SlotState::Available))?;
    let slot = SlotRepo::create(&state.pool, &input).await?;
    tracing::info!(
        slot_id = slot.id,
        zone_id = slot.zone_id,
        state = %slot.state,
        "Slot provisioned",
    );
    Ok((StatusCode::CREATED, Json(slot)))
}

/// GET /api/slots?id_zona=&estado=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SlotListParams>,
) -> AppResult<Json<Vec<Slot>>> {
    let slot_state = params
        .estado
        .as_deref()
        .map(SlotState::parse)
        .transpose()?;
    Ok(Json(SlotRepo::list(&state.pool, params.id_zona, slot_state).await?))
}

/// GET /api/slots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Slot>> {
    let slot = SlotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(slot))
}

/// PUT|PATCH /api/slots/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateSlot>,
) -> AppResult<Json<Slot>> {
    let slot = state
        .store
        .update_slot(id, &input, state.config.slot_release_policy)
        .await?
        .ok_or_else(|| not_found(id))?;
    if input.state.is_some() {
        tracing::info!(slot_id = id, state = %slot.state, "Slot state edited");
    }
    Ok(Json(slot))
}

/// DELETE /api/slots/{id}
///
/// Slots referenced by any ticket cannot be deleted (409).
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if SlotRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
