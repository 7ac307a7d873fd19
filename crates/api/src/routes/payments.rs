use axum::routing::get;
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Payment routes mounted at `/pagos`.
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
        .route("/", get(payments::list).post(payments::create))
        .route(
            "/{id}",
            get(payments::get_by_id)
                .put(payments::update)
                .patch(payments::update)
                .delete(payments::delete),
        )
}
