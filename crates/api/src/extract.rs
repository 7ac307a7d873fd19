//! Request extractors with error bodies in the API's JSON error format.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` whose rejections (malformed JSON, unknown state labels,
/// missing fields) become `400` [`AppError::BadRequest`] responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` with the same treatment, so a malformed id such as
/// `/tickets/abc` is a JSON `400` too.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
