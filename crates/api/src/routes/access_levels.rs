use axum::routing::get;
use axum::Router;

use crate::handlers::access_levels;
use crate::state::AppState;

/// Access level routes mounted at `/niveles`.
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
        .route("/", get(access_levels::list).post(access_levels::create))
        .route(
            "/{id}",
            get(access_levels::get_by_id)
                .put(access_levels::update)
                .patch(access_levels::update)
                .delete(access_levels::delete),
        )
}
