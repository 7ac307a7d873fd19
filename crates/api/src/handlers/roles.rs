//! Handlers for the `/roles` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::role::{CreateRole, Role, UpdateRole};
use yard_db::repositories::RoleRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Role", id })
}

/// POST /api/roles
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateRole>,
) -> AppResult<(StatusCode, Json<Role>)> {
    let role = RoleRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// GET /api/roles
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(RoleRepo::list(&state.pool).await?))
}

/// GET /api/roles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Role>> {
    let role = RoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(role))
}

/// PUT|PATCH /api/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateRole>,
) -> AppResult<Json<Role>> {
    let role = RoleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(role))
}

/// DELETE /api/roles/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if RoleRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
