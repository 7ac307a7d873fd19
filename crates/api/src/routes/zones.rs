use axum::routing::get;
use axum::Router;

use crate::handlers::zones;
use crate::state::AppState;

/// Yard zone routes mounted at `/zonas`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// PATCH  /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/ocupacion   -> occupancy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(zones::list).post(zones::create))
        .route(
            "/{id}",
            get(zones::get_by_id)
                .put(zones::update)
                .patch(zones::update)
                .delete(zones::delete),
        )
        .route("/{id}/ocupacion", get(zones::occupancy))
}
