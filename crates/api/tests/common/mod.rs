//! Shared helpers for the HTTP integration tests.
//!
//! Most tests run the app on a [`MemoryStore`]. Its database pool connects
//! lazily and is never used by the ticket, slot-edit, login and health
//! routes those tests drive. [`build_pg_app`] wires everything to a real
//! database for the CRUD routes.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use yard_api::auth::password::hash_password;
use yard_api::config::{LogFormat, ServerConfig};
use yard_api::router::build_app_router;
use yard_api::state::AppState;
use yard_core::roles::{LEVEL_OPERATIONAL, ROLE_OPERATOR};
use yard_core::slot::SlotState;
use yard_core::ticket::SlotReleasePolicy;
use yard_core::types::DbId;
use yard_db::models::ticket::ContainerInfo;
use yard_db::models::user::CreateUser;
use yard_db::store::{MemoryStore, PgStore};

pub const OPERATOR_EMAIL: &str = "operario@example.com";
pub const OPERATOR_PASSWORD: &str = "operario123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(policy: SlotReleasePolicy) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        slot_release_policy: policy,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over `store`.
pub fn build_test_app(store: Arc<MemoryStore>, policy: SlotReleasePolicy) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/yard_test")
        .expect("lazy pool should build from a valid URL");
    let state = AppState::new(pool, store, test_config(policy));
    build_app_router(state)
}

/// Build the application router with both the CRUD routes and the ticket
/// engine on `pool`.
pub fn build_pg_app(pool: PgPool) -> Router {
    let store = Arc::new(PgStore::new(pool.clone()));
    let state = AppState::new(pool, store, test_config(SlotReleasePolicy::Release));
    build_app_router(state)
}

/// A small in-memory yard: one operator, one zone with three free slots,
/// and three containers waiting to enter.
pub struct TestYard {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub operator_id: DbId,
    pub zone_id: DbId,
    pub slot_ids: Vec<DbId>,
    pub container_ids: Vec<DbId>,
}

impl TestYard {
    pub async fn new() -> Self {
        Self::with_policy(SlotReleasePolicy::Release).await
    }

    pub async fn with_policy(policy: SlotReleasePolicy) -> Self {
        let store = Arc::new(MemoryStore::new());

        let role = store.add_role(ROLE_OPERATOR).await;
        let level = store.add_access_level(LEVEL_OPERATIONAL).await;
        let operator = store
            .add_user(CreateUser {
                name: "Carlos López".into(),
                email: OPERATOR_EMAIL.into(),
                password_hash: hash_password(OPERATOR_PASSWORD).expect("hashing should succeed"),
                phone: None,
                company: Some("ENAPU".into()),
                role_id: role,
                access_level_id: level,
                is_active: Some(true),
            })
            .await;

        let zone = store.add_zone("Zona A", 100).await;
        let mut slot_ids = Vec::new();
        for column in 1..=3 {
            let slot = store
                .add_slot(zone.id, 1, column, 1, SlotState::Available)
                .await;
            slot_ids.push(slot.id);
        }

        let mut container_ids = Vec::new();
        for n in 1..=3 {
            let id = store
                .add_container(ContainerInfo {
                    barcode: Some(format!("CONT-{n:04}")),
                    container_number: Some(format!("ENAU{n:07}")),
                    container_type: "40HC".into(),
                    dimensions: "40HC".into(),
                    weight: 15_000.0,
                })
                .await;
            container_ids.push(id);
        }

        let app = build_test_app(Arc::clone(&store), policy);
        Self {
            store,
            app,
            operator_id: operator.id,
            zone_id: zone.id,
            slot_ids,
            container_ids,
        }
    }

    /// Open a ticket for container `container` on the first free slot of
    /// `candidates` and return its id.
    pub async fn open_ticket(&self, container: DbId, candidates: &[DbId]) -> DbId {
        let body = serde_json::json!({
            "id_usuario": self.operator_id,
            "id_contenedor": container,
            "candidatos": candidates,
        });
        let response = post_json(self.app.clone(), "/api/tickets", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"]
            .as_i64()
            .expect("ticket id should be a number")
    }

    /// Request a state change and return the response.
    pub async fn change_state(&self, ticket: DbId, estado: &str) -> Response {
        patch_json(
            self.app.clone(),
            &format!("/api/tickets/{ticket}/cambiar_estado"),
            serde_json::json!({ "estado": estado }),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, &body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, &body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PATCH, uri, &body)).await
}

/// PATCH with an arbitrary (possibly empty or malformed) body.
pub async fn patch_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
