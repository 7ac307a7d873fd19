//! Ticket routes. Tickets are never edited or deleted directly; their only
//! write paths are opening (POST) and `cambiar_estado`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Ticket routes mounted at `/tickets`.
///
/// ```text
/// GET   /                      -> list (?estado=&usuario_id=)
/// POST  /                      -> create
/// GET   /by_estado             -> by_state (?estado=)
/// GET   /by_usuario            -> by_user (?usuario_id=)
/// GET   /{id}                  -> get_by_id
/// PATCH /{id}/cambiar_estado   -> change_state
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list).post(tickets::create))
        .route("/by_estado", get(tickets::by_state))
        .route("/by_usuario", get(tickets::by_user))
        .route("/{id}", get(tickets::get_by_id))
        .route("/{id}/cambiar_estado", patch(tickets::change_state))
}
