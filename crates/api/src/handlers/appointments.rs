//! Handlers for the `/citas` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::appointment::{Appointment, CreateAppointment, UpdateAppointment};
use yard_db::repositories::AppointmentRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Appointment", id })
}

/// POST /api/citas
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateAppointment>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let appointment = AppointmentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/citas
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(AppointmentRepo::list(&state.pool).await?))
}

/// GET /api/citas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Appointment>> {
    let appointment = AppointmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(appointment))
}

/// PUT|PATCH /api/citas/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateAppointment>,
) -> AppResult<Json<Appointment>> {
    let appointment = AppointmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(appointment))
}

/// DELETE /api/citas/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if AppointmentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
