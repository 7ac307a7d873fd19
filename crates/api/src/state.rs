use std::sync::Arc;

use yard_db::store::YardStore;

use crate::auth::credentials::CredentialVerifier;
use crate::config::ServerConfig;
use crate::engine::{SlotAllocator, TicketLifecycle};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used by the plain CRUD handlers.
    pub pool: yard_db::DbPool,
    /// Entity store behind the ticket engine, slot edits and login.
    pub store: Arc<dyn YardStore>,
    pub config: Arc<ServerConfig>,
    pub allocator: SlotAllocator,
    pub lifecycle: TicketLifecycle,
    pub credentials: CredentialVerifier,
}

impl AppState {
    /// Wire the engine components to `store`.
    pub fn new(pool: yard_db::DbPool, store: Arc<dyn YardStore>, config: ServerConfig) -> Self {
        let policy = config.slot_release_policy;
        Self {
            pool,
            allocator: SlotAllocator::new(Arc::clone(&store)),
            lifecycle: TicketLifecycle::new(Arc::clone(&store), policy),
            credentials: CredentialVerifier::new(Arc::clone(&store)),
            store,
            config: Arc::new(config),
        }
    }
}
