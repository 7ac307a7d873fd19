use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User routes mounted at `/usuarios`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// POST   /login       -> login
/// GET    /by_role     -> by_role (?role=)
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// PATCH  /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/login", post(users::login))
        .route("/by_role", get(users::by_role))
        .route(
            "/{id}",
            get(users::get_by_id)
                .put(users::update)
                .patch(users::update)
                .delete(users::delete),
        )
}
