//! Slot allocation for incoming containers.

use std::sync::Arc;

use chrono::Utc;
use yard_core::error::CoreError;
use yard_core::slot::{select_available, SlotState};
use yard_core::types::{DbId, Timestamp};
use yard_db::models::ticket::{NewTicket, Ticket};
use yard_db::store::YardStore;

use super::EngineResult;

/// The container being admitted and the operator handling it.
#[derive(Debug, Clone)]
pub struct TicketEntry {
    pub entered_at: Timestamp,
    pub user_id: DbId,
    pub container_id: DbId,
}

/// Picks a free slot from an ordered candidate list and opens a ticket on it.
#[derive(Clone)]
pub struct SlotAllocator {
    store: Arc<dyn YardStore>,
}

impl SlotAllocator {
    pub fn new(store: Arc<dyn YardStore>) -> Self {
        Self { store }
    }

    /// Open a `Pending` ticket for `entry` on the first available slot in
    /// `candidates`.
    ///
    /// Candidate order is the caller's preference order. The slot claim and
    /// the ticket insert are one atomic store operation; when a concurrent
    /// request wins a slot first, that slot is dropped and selection runs
    /// again over fresh slot states. Fails with
    /// [`CoreError::NoSlotAvailable`] once no candidate is left.
    pub async fn allocate(
        &self,
        entry: &TicketEntry,
        candidates: &[DbId],
    ) -> EngineResult<Ticket> {
        if candidates.is_empty() {
            return Err(
                CoreError::Validation("At least one candidate slot is required".into()).into(),
            );
        }
        let now = Utc::now();
        if entry.entered_at > now {
            return Err(CoreError::Validation("Entry time cannot be in the future".into()).into());
        }

        let mut ordered: Vec<DbId> = Vec::with_capacity(candidates.len());
        for id in candidates {
            if !ordered.contains(id) {
                ordered.push(*id);
            }
        }

        let mut lost: Vec<DbId> = Vec::new();
        loop {
            let slots = self.store.find_slots(&ordered).await?;
            if slots.is_empty() {
                return Err(CoreError::NotFound {
                    entity: "Slot",
                    id: ordered[0],
                }
                .into());
            }

            let states: Vec<(DbId, SlotState)> = ordered
                .iter()
                .filter_map(|id| slots.iter().find(|s| s.id == *id))
                .map(|s| (s.id, s.state))
                .collect();

            let Some(slot_id) = select_available(&states, &lost) else {
                tracing::info!(
                    candidates = ordered.len(),
                    container_id = entry.container_id,
                    "No slot available",
                );
                return Err(CoreError::NoSlotAvailable {
                    candidates: ordered.len(),
                }
                .into());
            };

            let input = NewTicket {
                entered_at: entry.entered_at,
                slot_id,
                user_id: entry.user_id,
                container_id: entry.container_id,
            };
            match self.store.open_ticket(&input, Utc::now()).await? {
                Some(ticket) => {
                    tracing::info!(
                        ticket_id = ticket.id,
                        slot_id,
                        container_id = entry.container_id,
                        user_id = entry.user_id,
                        "Slot allocated",
                    );
                    return Ok(ticket);
                }
                None => {
                    tracing::debug!(slot_id, "Lost allocation race, trying next candidate");
                    lost.push(slot_id);
                }
            }
        }
    }

    /// Allocate within a zone, preferring the lowest level, then row, then
    /// column.
    pub async fn allocate_in_zone(
        &self,
        entry: &TicketEntry,
        zone_id: DbId,
    ) -> EngineResult<Ticket> {
        let candidates: Vec<DbId> = self
            .store
            .list_zone_slots(zone_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if candidates.is_empty() {
            return Err(CoreError::Validation(format!("Zone {zone_id} has no slots")).into());
        }
        self.allocate(entry, &candidates).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;
    use yard_core::ticket::{SlotReleasePolicy, TicketState};
    use yard_db::models::ticket::ContainerInfo;
    use yard_db::models::user::CreateUser;
    use yard_db::store::{MemoryStore, StoreError};

    use super::*;

    struct Yard {
        store: Arc<MemoryStore>,
        allocator: SlotAllocator,
        zone_id: DbId,
        user_id: DbId,
        container_id: DbId,
    }

    async fn yard() -> Yard {
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
        let zone = store.add_zone("A", 100).await;
        let container_id = store
            .add_container(ContainerInfo {
                barcode: Some("CNT0001".into()),
                container_number: None,
                container_type: "Dry".into(),
                dimensions: "20x8x8".into(),
                weight: 2200.0,
            })
            .await;
        Yard {
            allocator: SlotAllocator::new(store.clone()),
            store,
            zone_id: zone.id,
            user_id: user.id,
            container_id,
        }
    }

    impl Yard {
        fn entry(&self) -> TicketEntry {
            TicketEntry {
                entered_at: Utc::now() - Duration::minutes(2),
                user_id: self.user_id,
                container_id: self.container_id,
            }
        }

        async fn another_container(&self, barcode: &str) -> TicketEntry {
            let container_id = self
                .store
                .add_container(ContainerInfo {
                    barcode: Some(barcode.into()),
                    container_number: None,
                    container_type: "Dry".into(),
                    dimensions: "20x8x8".into(),
                    weight: 1800.0,
                })
                .await;
            TicketEntry {
                container_id,
                ..self.entry()
            }
        }

        async fn slot(&self, row: i32, column: i32, level: i32, state: SlotState) -> DbId {
            self.store
                .add_slot(self.zone_id, row, column, level, state)
                .await
                .id
        }
    }

    #[tokio::test]
    async fn picks_first_available_in_caller_order() {
        let yard = yard().await;
        let occupied = yard.slot(1, 1, 1, SlotState::Occupied).await;
        let second = yard.slot(1, 2, 1, SlotState::Available).await;
        let third = yard.slot(1, 3, 1, SlotState::Available).await;

        let ticket = yard
            .allocator
            .allocate(&yard.entry(), &[occupied, third, second])
            .await
            .unwrap();

        assert_eq!(ticket.slot_id, third);
        assert_eq!(ticket.state, TicketState::Pending);
        assert!(ticket.exited_at.is_none());
        assert_eq!(yard.store.slot(third).await.unwrap().state, SlotState::Occupied);
        assert_eq!(yard.store.slot(second).await.unwrap().state, SlotState::Available);
    }

    #[tokio::test]
    async fn never_falls_back_to_an_unavailable_slot() {
        let yard = yard().await;
        let occupied = yard.slot(1, 1, 1, SlotState::Occupied).await;
        let maintenance = yard.slot(1, 2, 1, SlotState::Maintenance).await;

        let result = yard
            .allocator
            .allocate(&yard.entry(), &[occupied, maintenance])
            .await;

        assert_matches!(
            result,
            Err(StoreError::Core(CoreError::NoSlotAvailable { candidates: 2 }))
        );
        assert!(yard.store.tickets().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_empty_and_unknown_candidates() {
        let yard = yard().await;
        assert_matches!(
            yard.allocator.allocate(&yard.entry(), &[]).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            yard.allocator.allocate(&yard.entry(), &[4242]).await,
            Err(StoreError::Core(CoreError::NotFound { entity: "Slot", .. }))
        );
    }

    #[tokio::test]
    async fn rejects_future_entry_time() {
        let yard = yard().await;
        let slot = yard.slot(1, 1, 1, SlotState::Available).await;
        let entry = TicketEntry {
            entered_at: Utc::now() + Duration::hours(1),
            ..yard.entry()
        };
        assert_matches!(
            yard.allocator.allocate(&entry, &[slot]).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
        assert_eq!(yard.store.slot(slot).await.unwrap().state, SlotState::Available);
    }

    #[tokio::test]
    async fn zone_allocation_fills_ground_level_first() {
        let yard = yard().await;
        let upper = yard.slot(1, 1, 2, SlotState::Available).await;
        let ground_far = yard.slot(2, 1, 1, SlotState::Available).await;
        let ground_near = yard.slot(1, 5, 1, SlotState::Available).await;

        let first = yard
            .allocator
            .allocate_in_zone(&yard.entry(), yard.zone_id)
            .await
            .unwrap();
        let second = yard
            .allocator
            .allocate_in_zone(&yard.another_container("CNT0002").await, yard.zone_id)
            .await
            .unwrap();
        let third = yard
            .allocator
            .allocate_in_zone(&yard.another_container("CNT0003").await, yard.zone_id)
            .await
            .unwrap();

        assert_eq!(
            [first.slot_id, second.slot_id, third.slot_id],
            [ground_near, ground_far, upper]
        );
        let fourth = yard.another_container("CNT0004").await;
        assert_matches!(
            yard.allocator.allocate_in_zone(&fourth, yard.zone_id).await,
            Err(StoreError::Core(CoreError::NoSlotAvailable { .. }))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_for_one_slot_yield_one_ticket() {
        let yard = yard().await;
        let slot = yard.slot(1, 1, 1, SlotState::Available).await;

        let mut handles = Vec::new();
        for n in 0..8 {
            let allocator = yard.allocator.clone();
            let entry = yard.another_container(&format!("CNT01{n:02}")).await;
            handles.push(tokio::spawn(async move {
                allocator.allocate(&entry, &[slot]).await
            }));
        }

        let mut won = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(ticket) => {
                    assert_eq!(ticket.slot_id, slot);
                    won += 1;
                }
                Err(StoreError::Core(err)) => assert!(err.is_retryable(), "unexpected {err:?}"),
                Err(other) => panic!("unexpected store error: {other:?}"),
            }
        }

        assert_eq!(won, 1);
        assert_eq!(yard.store.tickets().await.len(), 1);
        yard.store
            .check_invariants(SlotReleasePolicy::Release)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn container_already_in_the_yard_is_a_conflict() {
        let yard = yard().await;
        let first = yard.slot(1, 1, 1, SlotState::Available).await;
        let spare = yard.slot(1, 2, 1, SlotState::Available).await;
        yard.allocator.allocate(&yard.entry(), &[first]).await.unwrap();

        let result = yard.allocator.allocate(&yard.entry(), &[spare]).await;

        assert_matches!(result, Err(StoreError::Core(CoreError::Conflict(_))));
        assert_eq!(yard.store.slot(spare).await.unwrap().state, SlotState::Available);
    }
}
