use axum::routing::get;
use axum::Router;

use crate::handlers::vessels;
use crate::state::AppState;

/// Vessel routes mounted at `/buques`.
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
        .route("/", get(vessels::list).post(vessels::create))
        .route(
            "/{id}",
            get(vessels::get_by_id)
                .put(vessels::update)
                .patch(vessels::update)
                .delete(vessels::delete),
        )
}
