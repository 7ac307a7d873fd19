//! Handlers for the `/facturas` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::invoice::{CreateInvoice, Invoice, UpdateInvoice};
use yard_db::repositories::InvoiceRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Invoice", id })
}

/// POST /api/facturas
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateInvoice>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    let invoice = InvoiceRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// GET /api/facturas
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Invoice>>> {
    Ok(Json(InvoiceRepo::list(&state.pool).await?))
}

/// GET /api/facturas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Invoice>> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(invoice))
}

/// PUT|PATCH /api/facturas/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateInvoice>,
) -> AppResult<Json<Invoice>> {
    let invoice = InvoiceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(invoice))
}

/// DELETE /api/facturas/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if InvoiceRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
