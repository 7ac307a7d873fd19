//! Handlers for the `/niveles` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::access_level::{AccessLevel, CreateAccessLevel, UpdateAccessLevel};
use yard_db::repositories::AccessLevelRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "AccessLevel", id })
}

/// POST /api/niveles
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateAccessLevel>,
) -> AppResult<(StatusCode, Json<AccessLevel>)> {
    let level = AccessLevelRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(level)))
}

/// GET /api/niveles
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<AccessLevel>>> {
    Ok(Json(AccessLevelRepo::list(&state.pool).await?))
}

/// GET /api/niveles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<AccessLevel>> {
    let level = AccessLevelRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(level))
}

/// PUT|PATCH /api/niveles/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateAccessLevel>,
) -> AppResult<Json<AccessLevel>> {
    let level = AccessLevelRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(level))
}

/// DELETE /api/niveles/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if AccessLevelRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
