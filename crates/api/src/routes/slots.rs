use axum::routing::get;
use axum::Router;

use crate::handlers::slots;
use crate::state::AppState;

/// Slot routes mounted at `/slots`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// PATCH  /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
/// (`GET /` accepts `?id_zona=&estado=`)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(slots::list).post(slots::create))
        .route(
            "/{id}",
            get(slots::get_by_id)
                .put(slots::update)
                .patch(slots::update)
                .delete(slots::delete),
        )
}
