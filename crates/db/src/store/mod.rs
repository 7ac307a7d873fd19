//! The entity store used by the ticket engine.
//!
//! [`YardStore`] is the seam between the slot allocator / ticket lifecycle
//! and persistence. Each method is one atomic unit: allocation claims the
//! slot and inserts the ticket together, and a transition locks the ticket,
//! plans against the locked row, and writes ticket and slot together.
//!
//! - [`PgStore`] -- Postgres, transactions and row locks.
//! - [`MemoryStore`] -- in-process maps behind one async mutex, for tests.

use async_trait::async_trait;
use yard_core::error::CoreError;
use yard_core::ticket::{SlotReleasePolicy, TicketState, TransitionPlan};
use yard_core::types::{DbId, Timestamp};

use crate::models::slot::{Slot, UpdateSlot};
use crate::models::ticket::{NewTicket, Ticket, TicketDetail, TicketFilter};
use crate::models::user::{User, UserResponse};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by a [`YardStore`].
///
/// Domain outcomes (missing references, rule violations) arrive as
/// [`StoreError::Core`]; connectivity and query failures as
/// [`StoreError::Database`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A transition as the store applied it.
#[derive(Debug, Clone)]
pub struct AppliedTransition {
    /// The ticket as it was locked, before the write.
    pub previous: Ticket,
    /// The ticket after the write (equal to `previous` for a no-op).
    pub ticket: Ticket,
    pub plan: TransitionPlan,
}

#[async_trait]
pub trait YardStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_response(&self, id: DbId) -> StoreResult<Option<UserResponse>>;

    /// Fetch the slots with the given ids, skipping unknown ids.
    async fn find_slots(&self, ids: &[DbId]) -> StoreResult<Vec<Slot>>;

    /// Every slot of a zone, lowest level first, then row, then column.
    async fn list_zone_slots(&self, zone_id: DbId) -> StoreResult<Vec<Slot>>;

    /// Manual slot edit. A state change is checked against the tickets that
    /// hold the slot under `policy`. Returns `None` for an unknown slot.
    async fn update_slot(
        &self,
        id: DbId,
        input: &UpdateSlot,
        policy: SlotReleasePolicy,
    ) -> StoreResult<Option<Slot>>;

    /// Atomically claim `input.slot_id` (`Disponible -> Ocupado`) and insert
    /// a ticket in the initial state on it.
    ///
    /// Returns `Ok(None)` when the slot was no longer available, so the
    /// caller can move on to another candidate. An unknown user or container
    /// is [`CoreError::NotFound`].
    async fn open_ticket(&self, input: &NewTicket, now: Timestamp) -> StoreResult<Option<Ticket>>;

    async fn find_ticket(&self, id: DbId) -> StoreResult<Option<Ticket>>;

    async fn find_ticket_detail(&self, id: DbId) -> StoreResult<Option<TicketDetail>>;

    /// Ticket representations matching `filter`, in creation order.
    async fn list_ticket_details(&self, filter: &TicketFilter) -> StoreResult<Vec<TicketDetail>>;

    /// Move a ticket to `target`, applying the slot side effect of the plan
    /// in the same atomic unit. A same-state request writes nothing.
    async fn transition_ticket(
        &self,
        id: DbId,
        target: TicketState,
        policy: SlotReleasePolicy,
        now: Timestamp,
    ) -> StoreResult<AppliedTransition>;
}

fn container_already_admitted(container_id: DbId) -> StoreError {
    StoreError::Core(CoreError::Conflict(format!(
        "Container {container_id} already has an active ticket"
    )))
}

fn ticket_not_found(id: DbId) -> StoreError {
    StoreError::Core(CoreError::NotFound {
        entity: "Ticket",
        id,
    })
}
