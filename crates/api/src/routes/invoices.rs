use axum::routing::get;
use axum::Router;

use crate::handlers::invoices;
use crate::state::AppState;

/// Invoice routes mounted at `/facturas`.
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
        .route("/", get(invoices::list).post(invoices::create))
        .route(
            "/{id}",
            get(invoices::get_by_id)
                .put(invoices::update)
                .patch(invoices::update)
                .delete(invoices::delete),
        )
}
