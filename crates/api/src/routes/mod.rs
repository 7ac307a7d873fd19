pub mod access_levels;
pub mod appointments;
pub mod containers;
pub mod health;
pub mod invoices;
pub mod payments;
pub mod roles;
pub mod slots;
pub mod tickets;
pub mod users;
pub mod vessels;
pub mod zones;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /roles                              list, create
/// /roles/{id}                         get, update, delete
///
/// /niveles                            list, create
/// /niveles/{id}                       get, update, delete
///
/// /usuarios                           list, create
/// /usuarios/login                     verify credentials (POST)
/// /usuarios/by_role                   active users by role (GET ?role=)
/// /usuarios/{id}                      get, update, delete
///
/// /zonas                              list, create
/// /zonas/{id}                         get, update, delete
/// /zonas/{id}/ocupacion               slot counts per state (GET)
///
/// /slots                              list (?id_zona=&estado=), create
/// /slots/{id}                         get, update, delete
///
/// /buques                             list, create
/// /buques/{id}                        get, update, delete
///
/// /citas                              list, create
/// /citas/{id}                         get, update, delete
///
/// /contenedores                       list, create
/// /contenedores/{id}                  get, update, delete
///
/// /tickets                            list (?estado=&usuario_id=), open
/// /tickets/by_estado                  tickets in a state (GET ?estado=)
/// /tickets/by_usuario                 tickets of a user (GET ?usuario_id=)
/// /tickets/{id}                       get
/// /tickets/{id}/cambiar_estado        change state (PATCH)
///
/// /facturas                           list, create
/// /facturas/{id}                      get, update, delete
///
/// /pagos                              list, create
/// /pagos/{id}                         get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/roles", roles::router())
        .nest("/niveles", access_levels::router())
        .nest("/usuarios", users::router())
        .nest("/zonas", zones::router())
        .nest("/slots", slots::router())
        .nest("/buques", vessels::router())
        .nest("/citas", appointments::router())
        .nest("/contenedores", containers::router())
        .nest("/tickets", tickets::router())
        .nest("/facturas", invoices::router())
        .nest("/pagos", payments::router())
}
