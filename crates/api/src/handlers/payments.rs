//! Handlers for the `/pagos` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::payment::{CreatePayment, Payment, UpdatePayment};
use yard_db::repositories::PaymentRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Payment", id })
}

/// POST /api/pagos
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePayment>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let payment = PaymentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET /api/pagos
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(PaymentRepo::list(&state.pool).await?))
}

/// GET /api/pagos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Payment>> {
    let payment = PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(payment))
}

/// PUT|PATCH /api/pagos/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdatePayment>,
) -> AppResult<Json<Payment>> {
    let payment = PaymentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(payment))
}

/// DELETE /api/pagos/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if PaymentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
