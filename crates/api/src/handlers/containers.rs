//! Handlers for the `/contenedores` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::container::{Container, CreateContainer, UpdateContainer};
use yard_db::repositories::ContainerRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Container", id })
}

/// POST /api/contenedores
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateContainer>,
) -> AppResult<(StatusCode, Json<Container>)> {
    let container = ContainerRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(container)))
}

/// GET /api/contenedores
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Container>>> {
    Ok(Json(ContainerRepo::list(&state.pool).await?))
}

/// GET /api/contenedores/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Container>> {
    let container = ContainerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(container))
}

/// PUT|PATCH /api/contenedores/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateContainer>,
) -> AppResult<Json<Container>> {
    let container = ContainerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(container))
}

/// DELETE /api/contenedores/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if ContainerRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
