//! Ticket state changes and ticket queries.

use std::sync::Arc;

use chrono::Utc;
use yard_core::error::CoreError;
use yard_core::ticket::{SlotReleasePolicy, TicketState};
use yard_core::types::DbId;
use yard_db::models::ticket::{TicketDetail, TicketFilter};
use yard_db::store::YardStore;

use super::EngineResult;

/// Drives tickets through `Pendiente -> Validado -> En Cola -> En Proceso ->
/// Completado` and keeps the referenced slot's occupancy in step.
#[derive(Clone)]
pub struct TicketLifecycle {
    store: Arc<dyn YardStore>,
    policy: SlotReleasePolicy,
}

impl TicketLifecycle {
    pub fn new(store: Arc<dyn YardStore>, policy: SlotReleasePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> SlotReleasePolicy {
        self.policy
    }

    /// Apply a requested state change and return the updated ticket.
    ///
    /// `requested` is the raw `estado` value from the request; absent or
    /// blank is a validation error and nothing is written.
    pub async fn change_state(
        &self,
        ticket_id: DbId,
        requested: Option<&str>,
    ) -> EngineResult<TicketDetail> {
        let raw = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::Validation("The 'estado' field is required".into()))?;
        let target = TicketState::parse(raw)?;

        let applied = self
            .store
            .transition_ticket(ticket_id, target, self.policy, Utc::now())
            .await?;
        let plan = &applied.plan;

        if plan.is_noop() {
            tracing::debug!(ticket_id, state = %plan.to, "Ticket already in requested state");
        } else if plan.lenient {
            tracing::warn!(
                ticket_id,
                from = %plan.from,
                to = %plan.to,
                slot_id = applied.ticket.slot_id,
                lenient = true,
                "Ticket completed without passing through intermediate states",
            );
        } else {
            tracing::info!(
                ticket_id,
                from = %plan.from,
                to = %plan.to,
                slot_id = applied.ticket.slot_id,
                slot_effect = ?plan.slot_effect,
                lenient = false,
                "Ticket state changed",
            );
        }

        self.find(ticket_id).await
    }

    pub async fn find(&self, ticket_id: DbId) -> EngineResult<TicketDetail> {
        self.store
            .find_ticket_detail(ticket_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Ticket",
                    id: ticket_id,
                }
                .into()
            })
    }

    /// Tickets in `state`, in creation order.
    pub async fn list_by_state(&self, state: TicketState) -> EngineResult<Vec<TicketDetail>> {
        self.store
            .list_ticket_details(&TicketFilter::by_state(state))
            .await
    }

    /// Tickets handled by `user_id`, in creation order.
    pub async fn list_by_user(&self, user_id: DbId) -> EngineResult<Vec<TicketDetail>> {
        self.store
            .list_ticket_details(&TicketFilter::by_user(user_id))
            .await
    }

    pub async fn list(&self, filter: &TicketFilter) -> EngineResult<Vec<TicketDetail>> {
        self.store.list_ticket_details(filter).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;
    use yard_core::slot::SlotState;
    use yard_db::models::ticket::{ContainerInfo, Ticket};
    use yard_db::models::user::CreateUser;
    use yard_db::store::{MemoryStore, StoreError};

    use super::*;
    use crate::engine::{SlotAllocator, TicketEntry};

    struct Harness {
        store: Arc<MemoryStore>,
        allocator: SlotAllocator,
        lifecycle: TicketLifecycle,
        user_id: DbId,
        container_id: DbId,
        slot_id: DbId,
    }

    async fn harness(policy: SlotReleasePolicy) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let role = store.add_role("OPERARIO").await;
        let level = store.add_access_level("Operativo").await;
        let user = store
            .add_user(CreateUser {
                name: "Operario".into(),
                email: "op@puerto.test".into(),
                password_hash: "hash".into(),
                phone: None,
                company: None,
                role_id: role,
                access_level_id: level,
                is_active: None,
            })
            .await;
        let zone = store.add_zone("B", 150).await;
        let slot = store.add_slot(zone.id, 2, 3, 1, SlotState::Available).await;
        let container_id = store
            .add_container(ContainerInfo {
                barcode: Some("CNT0042".into()),
                container_number: Some("MSCU0000042".into()),
                container_type: "Reefer".into(),
                dimensions: "40x8x9".into(),
                weight: 3100.5,
            })
            .await;
        Harness {
            allocator: SlotAllocator::new(store.clone()),
            lifecycle: TicketLifecycle::new(store.clone(), policy),
            store,
            user_id: user.id,
            container_id,
            slot_id: slot.id,
        }
    }

    impl Harness {
        async fn open(&self) -> Ticket {
            let entry = TicketEntry {
                entered_at: Utc::now() - Duration::minutes(30),
                user_id: self.user_id,
                container_id: self.container_id,
            };
            self.allocator.allocate(&entry, &[self.slot_id]).await.unwrap()
        }

        async fn slot_state(&self) -> SlotState {
            self.store.slot(self.slot_id).await.unwrap().state
        }

        async fn step(&self, ticket_id: DbId, label: &str) -> TicketDetail {
            self.lifecycle
                .change_state(ticket_id, Some(label))
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn in_progress_occupies_slot_without_exit_time() {
        let h = harness(SlotReleasePolicy::Release).await;
        let ticket = h.open().await;

        h.step(ticket.id, "Validado").await;
        h.step(ticket.id, "En Cola").await;
        let detail = h.step(ticket.id, "En Proceso").await;

        assert_eq!(detail.state, TicketState::InProgress);
        assert!(detail.exited_at.is_none());
        assert_eq!(h.slot_state().await, SlotState::Occupied);
    }

    #[tokio::test]
    async fn completion_stamps_exit_and_releases_slot() {
        let h = harness(SlotReleasePolicy::Release).await;
        let ticket = h.open().await;
        for label in ["Validado", "En Cola", "En Proceso"] {
            h.step(ticket.id, label).await;
        }

        let detail = h.step(ticket.id, "Completado").await;

        let exit = detail.exited_at.expect("completed tickets carry an exit time");
        assert!(exit >= detail.entered_at);
        assert_eq!(h.slot_state().await, SlotState::Available);
        h.store
            .check_invariants(SlotReleasePolicy::Release)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn retain_policy_keeps_slot_occupied_after_completion() {
        let h = harness(SlotReleasePolicy::Retain).await;
        let ticket = h.open().await;
        h.step(ticket.id, "Completado").await;

        assert_eq!(h.slot_state().await, SlotState::Occupied);
        h.store
            .check_invariants(SlotReleasePolicy::Retain)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_state_is_rejected_without_mutation() {
        let h = harness(SlotReleasePolicy::Release).await;
        let ticket = h.open().await;

        for requested in [None, Some(""), Some("   ")] {
            assert_matches!(
                h.lifecycle.change_state(ticket.id, requested).await,
                Err(StoreError::Core(CoreError::Validation(_)))
            );
        }
        assert_matches!(
            h.lifecycle.change_state(ticket.id, Some("Perdido")).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );

        let stored = h.store.tickets().await;
        assert_eq!(stored, vec![ticket]);
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found() {
        let h = harness(SlotReleasePolicy::Release).await;
        assert_matches!(
            h.lifecycle.change_state(9999, Some("Validado")).await,
            Err(StoreError::Core(CoreError::NotFound { entity: "Ticket", id: 9999 }))
        );
    }

    #[tokio::test]
    async fn completing_twice_keeps_the_first_exit_time() {
        let h = harness(SlotReleasePolicy::Release).await;
        let ticket = h.open().await;

        let first = h.step(ticket.id, "Completado").await;
        let second = h.step(ticket.id, "completado").await;

        assert_eq!(second.exited_at, first.exited_at);
        assert_eq!(second.updated_at, first.updated_at);
    }

    #[tokio::test]
    async fn backwards_and_skipping_moves_are_invalid() {
        let h = harness(SlotReleasePolicy::Release).await;
        let ticket = h.open().await;

        assert_matches!(
            h.lifecycle.change_state(ticket.id, Some("En Proceso")).await,
            Err(StoreError::Core(CoreError::InvalidTransition { .. }))
        );
        h.step(ticket.id, "Validado").await;
        assert_matches!(
            h.lifecycle.change_state(ticket.id, Some("Pendiente")).await,
            Err(StoreError::Core(CoreError::InvalidTransition { .. }))
        );
        h.step(ticket.id, "Completed").await;
        assert_matches!(
            h.lifecycle.change_state(ticket.id, Some("En Cola")).await,
            Err(StoreError::Core(CoreError::InvalidTransition { .. }))
        );
    }

    #[tokio::test]
    async fn released_slot_can_be_allocated_again() {
        let h = harness(SlotReleasePolicy::Release).await;
        let first = h.open().await;
        h.step(first.id, "Completado").await;

        let second = h.open().await;
        assert_eq!(second.slot_id, first.slot_id);
        h.store
            .check_invariants(SlotReleasePolicy::Release)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listings_filter_in_creation_order() {
        let h = harness(SlotReleasePolicy::Release).await;
        let first = h.open().await;
        h.step(first.id, "Completado").await;
        let second = h.open().await;

        let pending = h.lifecycle.list_by_state(TicketState::Pending).await.unwrap();
        assert_eq!(pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![second.id]);

        let mine = h.lifecycle.list_by_user(h.user_id).await.unwrap();
        assert_eq!(
            mine.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        assert_eq!(mine[0].slot_info.zone_name, "B");
        assert_eq!(mine[0].container_info.container_type, "Reefer");

        assert!(h.lifecycle.list_by_user(h.user_id + 1000).await.unwrap().is_empty());
    }
}
