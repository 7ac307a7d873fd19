//! Handlers for the `/zonas` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::zone::{CreateZone, UpdateZone, Zone, ZoneOccupancy};
use yard_db::repositories::ZoneRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Zone", id })
}

/// POST /api/zonas
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateZone>,
) -> AppResult<(StatusCode, Json<Zone>)> {
    let zone = ZoneRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// GET /api/zonas
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Zone>>> {
    Ok(Json(ZoneRepo::list(&state.pool).await?))
}

/// GET /api/zonas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Zone>> {
    let zone = ZoneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(zone))
}

/// PUT|PATCH /api/zonas/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateZone>,
) -> AppResult<Json<Zone>> {
    let zone = ZoneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(zone))
}

/// DELETE /api/zonas/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if ZoneRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/zonas/{id}/ocupacion
///
/// Slot counts per occupancy state alongside the zone's nominal capacity.
pub async fn occupancy(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<ZoneOccupancy>> {
    let occupancy = ZoneRepo::occupancy(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(occupancy))
}
