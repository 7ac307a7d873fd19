use axum::routing::get;
use axum::Router;

use crate::handlers::containers;
use crate::state::AppState;

/// Container routes mounted at `/contenedores`.
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
        .route("/", get(containers::list).post(containers::create))
        .route(
            "/{id}",
            get(containers::get_by_id)
                .put(containers::update)
                .patch(containers::update)
                .delete(containers::delete),
        )
}
