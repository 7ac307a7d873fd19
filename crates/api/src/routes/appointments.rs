use axum::routing::get;
use axum::Router;

use crate::handlers::appointments;
use crate::state::AppState;

/// Pickup appointment routes mounted at `/citas`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// PATCH  /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(appointments::list).post(appointments::create))
        .route(
            "/{id}",
            get(appointments::get_by_id)
                .put(appointments::update)
                .patch(appointments::update)
                .delete(appointments::delete),
        )
}
