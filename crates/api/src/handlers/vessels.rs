//! Handlers for the `/buques` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::vessel::{CreateVessel, UpdateVessel, Vessel};
use yard_db::repositories::VesselRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Vessel", id })
}

/// POST /api/buques
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateVessel>,
) -> AppResult<(StatusCode, Json<Vessel>)> {
    let vessel = VesselRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(vessel)))
}

/// GET /api/buques
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Vessel>>> {
    Ok(Json(VesselRepo::list(&state.pool).await?))
}

/// GET /api/buques/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Vessel>> {
    let vessel = VesselRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(vessel))
}

/// PUT|PATCH /api/buques/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateVessel>,
) -> AppResult<Json<Vessel>> {
    let vessel = VesselRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(vessel))
}

/// DELETE /api/buques/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if VesselRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
