use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use yard_core::error::CoreError;
use yard_db::store::StoreError;

use crate::auth::credentials::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `yard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the entity store behind the ticket engine.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A credential check failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Store(StoreError::Core(core)) => classify_core_error(core),
            AppError::Store(StoreError::Database(err)) | AppError::Database(err) => {
                classify_sqlx_error(err)
            }

            AppError::Auth(auth) => match auth {
                AuthError::MissingCredentials => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    auth.to_string(),
                ),
                AuthError::UnknownUser => (StatusCode::NOT_FOUND, "NOT_FOUND", auth.to_string()),
                AuthError::InvalidPassword => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", auth.to_string())
                }
                AuthError::Store(StoreError::Core(core)) => classify_core_error(core),
                AuthError::Store(StoreError::Database(err)) => classify_sqlx_error(err),
                AuthError::Hash(msg) => {
                    tracing::error!(error = %msg, "Password hash error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if self.is_retryable() {
            body["retryable"] = json!(true);
        }

        (status, axum::Json(body)).into_response()
    }
}

impl AppError {
    /// Whether the client may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Core(core) | AppError::Store(StoreError::Core(core)) => core.is_retryable(),
            _ => false,
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::InvalidTransition { .. } => (
            StatusCode::BAD_REQUEST,
            "INVALID_TRANSITION",
            core.to_string(),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::NoSlotAvailable { .. } => (
            StatusCode::CONFLICT,
            "NO_SLOT_AVAILABLE",
            core.to_string(),
        ),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign-key violations map to 409; the referenced row is missing or the
///   row being deleted is still referenced.
/// - Check constraint violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // foreign_key_violation
                Some("23503") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Operation violates reference constraint: {constraint}"),
                    );
                }
                // check_violation
                Some("23514") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn no_slot_available_is_a_retryable_conflict() {
        let (status, json) =
            render(AppError::Core(CoreError::NoSlotAvailable { candidates: 3 })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "NO_SLOT_AVAILABLE");
        assert_eq!(json["retryable"], true);
    }

    #[tokio::test]
    async fn store_errors_map_like_core_errors() {
        let err = AppError::Store(StoreError::Core(CoreError::NotFound {
            entity: "Ticket",
            id: 7,
        }));
        let (status, json) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Ticket with id 7 not found");
        assert!(json.get("retryable").is_none());
    }

    #[tokio::test]
    async fn invalid_transition_is_a_bad_request() {
        let err = AppError::Core(CoreError::InvalidTransition {
            from: "Completado".into(),
            to: "Pendiente".into(),
        });
        let (status, json) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn credential_failures_keep_login_status_codes() {
        let (missing, _) = render(AppError::Auth(AuthError::MissingCredentials)).await;
        let (unknown, _) = render(AppError::Auth(AuthError::UnknownUser)).await;
        let (wrong, _) = render(AppError::Auth(AuthError::InvalidPassword)).await;
        assert_eq!(missing, StatusCode::BAD_REQUEST);
        assert_eq!(unknown, StatusCode::NOT_FOUND);
        assert_eq!(wrong, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let (status, json) =
            render(AppError::InternalError("connection refused on 10.0.0.3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "An internal error occurred");
    }
}
