//! Postgres-backed [`YardStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use yard_core::error::CoreError;
use yard_core::slot::{validate_manual_change, validate_relocation};
use yard_core::ticket::{holds_slot, plan_transition, SlotEffect, SlotReleasePolicy, TicketState};
use yard_core::types::{DbId, Timestamp};

use super::{
    container_already_admitted, ticket_not_found, AppliedTransition, StoreResult, YardStore,
};
use crate::models::slot::{Slot, UpdateSlot};
use crate::models::ticket::{NewTicket, Ticket, TicketDetail, TicketFilter};
use crate::models::user::{User, UserResponse};
use crate::repositories::{SlotRepo, TicketRepo, UserRepo};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl YardStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_response(&self, id: DbId) -> StoreResult<Option<UserResponse>> {
        Ok(UserRepo::find_response_by_id(&self.pool, id).await?)
    }

    async fn find_slots(&self, ids: &[DbId]) -> StoreResult<Vec<Slot>> {
        Ok(SlotRepo::find_many(&self.pool, ids).await?)
    }

    async fn list_zone_slots(&self, zone_id: DbId) -> StoreResult<Vec<Slot>> {
        Ok(SlotRepo::list_by_zone(&self.pool, zone_id).await?)
    }

    async fn update_slot(
        &self,
        id: DbId,
        input: &UpdateSlot,
        policy: SlotReleasePolicy,
    ) -> StoreResult<Option<Slot>> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = SlotRepo::lock(&mut *tx, id).await? else {
            return Ok(None);
        };

        let states = TicketRepo::states_for_slot(&mut *tx, id).await?;
        validate_relocation(input.moves(&current), !states.is_empty())?;

        if let Some(next) = input.state {
            let held = states.into_iter().any(|state| holds_slot(state, policy));
            validate_manual_change(current.state, next, held)?;
        }

        let updated = SlotRepo::update_fields(&mut *tx, id, input).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn open_ticket(&self, input: &NewTicket, now: Timestamp) -> StoreResult<Option<Ticket>> {
        let mut tx = self.pool.begin().await?;

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(input.user_id)
                .fetch_one(&mut *tx)
                .await?;
        if !user_exists {
            return Err(CoreError::NotFound {
                entity: "User",
                id: input.user_id,
            }
            .into());
        }

        // Locking the container row serializes concurrent admissions of it.
        let container: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM containers WHERE id = $1 FOR UPDATE")
                .bind(input.container_id)
                .fetch_optional(&mut *tx)
                .await?;
        if container.is_none() {
            return Err(CoreError::NotFound {
                entity: "Container",
                id: input.container_id,
            }
            .into());
        }

        if TicketRepo::has_active_for_container(&mut *tx, input.container_id).await? {
            return Err(container_already_admitted(input.container_id));
        }

        if !SlotRepo::claim(&mut *tx, input.slot_id).await? {
            // Dropping the transaction rolls it back.
            return Ok(None);
        }

        let ticket = TicketRepo::insert(&mut *tx, input, now).await?;
        tx.commit().await?;
        Ok(Some(ticket))
    }

    async fn find_ticket(&self, id: DbId) -> StoreResult<Option<Ticket>> {
        Ok(TicketRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_ticket_detail(&self, id: DbId) -> StoreResult<Option<TicketDetail>> {
        Ok(TicketRepo::find_detail(&self.pool, id).await?)
    }

    async fn list_ticket_details(&self, filter: &TicketFilter) -> StoreResult<Vec<TicketDetail>> {
        Ok(TicketRepo::list_details(&self.pool, filter).await?)
    }

    async fn transition_ticket(
        &self,
        id: DbId,
        target: TicketState,
        policy: SlotReleasePolicy,
        now: Timestamp,
    ) -> StoreResult<AppliedTransition> {
        let mut tx = self.pool.begin().await?;

        let previous = TicketRepo::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| ticket_not_found(id))?;

        let plan = plan_transition(
            previous.state,
            previous.entered_at,
            previous.exited_at,
            target,
            policy,
            now,
        )?;

        if plan.is_noop() {
            return Ok(AppliedTransition {
                ticket: previous.clone(),
                previous,
                plan,
            });
        }

        let ticket = TicketRepo::apply(&mut *tx, id, &plan, now).await?;
        match plan.slot_effect {
            SlotEffect::Unchanged => {}
            SlotEffect::Occupy => SlotRepo::occupy(&mut *tx, previous.slot_id).await?,
            SlotEffect::Release => SlotRepo::release(&mut *tx, previous.slot_id).await?,
        }

        tx.commit().await?;
        Ok(AppliedTransition {
            previous,
            ticket,
            plan,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Run against a live database with `cargo test -- --ignored`.

    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use yard_core::slot::SlotState;

    use super::*;
    use crate::store::StoreError;

    /// Insert a zone with `slots` ground-level slots, a user, and a container.
    async fn seed(pool: &PgPool, slots: i32) -> (Vec<DbId>, DbId, DbId) {
        let role: DbId =
            sqlx::query_scalar("INSERT INTO roles (name) VALUES ('OPERARIO') RETURNING id")
                .fetch_one(pool)
                .await
                .unwrap();
        let level: DbId =
            sqlx::query_scalar("INSERT INTO access_levels (name) VALUES ('Operativo') RETURNING id")
                .fetch_one(pool)
                .await
                .unwrap();
        let user: DbId = sqlx::query_scalar(
            "INSERT INTO users (name, email, password_hash, role_id, access_level_id)
             VALUES ('Op', 'op@example.com', 'x', $1, $2) RETURNING id",
        )
        .bind(role)
        .bind(level)
        .fetch_one(pool)
        .await
        .unwrap();
        let zone: DbId =
            sqlx::query_scalar("INSERT INTO zones (name, capacity) VALUES ('A', 10) RETURNING id")
                .fetch_one(pool)
                .await
                .unwrap();
        let mut slot_ids = Vec::new();
        for column in 1..=slots {
            let id: DbId = sqlx::query_scalar(
                "INSERT INTO slots (zone_id, slot_row, slot_column, slot_level)
                 VALUES ($1, 1, $2, 1) RETURNING id",
            )
            .bind(zone)
            .bind(column)
            .fetch_one(pool)
            .await
            .unwrap();
            slot_ids.push(id);
        }
        let vessel: DbId = sqlx::query_scalar(
            "INSERT INTO vessels (name, shipping_line) VALUES ('Aurora', 'Maersk') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        let container: DbId = sqlx::query_scalar(
            "INSERT INTO containers (barcode, dimensions, container_type, weight, vessel_id)
             VALUES ('CNT001', '20x8x8', 'Dry', 1500.0, $1) RETURNING id",
        )
        .bind(vessel)
        .fetch_one(pool)
        .await
        .unwrap();
        (slot_ids, user, container)
    }

    /// A second container on the seeded vessel.
    async fn another_container(pool: &PgPool) -> DbId {
        sqlx::query_scalar(
            "INSERT INTO containers (barcode, dimensions, container_type, weight, vessel_id)
             SELECT 'CNT002', '40x8x9', 'Reefer', 3200.0, vessel_id FROM containers LIMIT 1
             RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn new_ticket(slot_id: DbId, user_id: DbId, container_id: DbId) -> NewTicket {
        NewTicket {
            entered_at: Utc::now() - Duration::minutes(5),
            slot_id,
            user_id,
            container_id,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn open_claims_the_slot(pool: PgPool) {
        let (slots, user, container) = seed(&pool, 1).await;
        let store = PgStore::new(pool.clone());

        let ticket = store
            .open_ticket(&new_ticket(slots[0], user, container), Utc::now())
            .await
            .unwrap()
            .expect("slot was available");
        assert_eq!(ticket.state, TicketState::Pending);
        assert!(ticket.exited_at.is_none());

        let slot = SlotRepo::find_by_id(&pool, slots[0]).await.unwrap().unwrap();
        assert_eq!(slot.state, SlotState::Occupied);

        let other = another_container(&pool).await;
        let second = store
            .open_ticket(&new_ticket(slots[0], user, other), Utc::now())
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn container_cannot_hold_two_active_tickets(pool: PgPool) {
        let (slots, user, container) = seed(&pool, 2).await;
        let store = PgStore::new(pool.clone());
        store
            .open_ticket(&new_ticket(slots[0], user, container), Utc::now())
            .await
            .unwrap()
            .unwrap();

        let result = store
            .open_ticket(&new_ticket(slots[1], user, container), Utc::now())
            .await;
        assert_matches!(result, Err(StoreError::Core(CoreError::Conflict(_))));

        let slot = SlotRepo::find_by_id(&pool, slots[1]).await.unwrap().unwrap();
        assert_eq!(slot.state, SlotState::Available);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn open_rejects_unknown_user(pool: PgPool) {
        let (slots, _user, container) = seed(&pool, 1).await;
        let store = PgStore::new(pool.clone());

        let result = store
            .open_ticket(&new_ticket(slots[0], 9999, container), Utc::now())
            .await;
        assert_matches!(
            result,
            Err(StoreError::Core(CoreError::NotFound { entity: "User", .. }))
        );

        let slot = SlotRepo::find_by_id(&pool, slots[0]).await.unwrap().unwrap();
        assert_eq!(slot.state, SlotState::Available);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn completion_releases_the_slot(pool: PgPool) {
        let (slots, user, container) = seed(&pool, 1).await;
        let store = PgStore::new(pool.clone());
        let ticket = store
            .open_ticket(&new_ticket(slots[0], user, container), Utc::now())
            .await
            .unwrap()
            .unwrap();

        let applied = store
            .transition_ticket(
                ticket.id,
                TicketState::Completed,
                SlotReleasePolicy::Release,
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(applied.plan.lenient);
        let exit = applied.ticket.exited_at.expect("exit set on completion");
        assert!(exit >= applied.ticket.entered_at);

        let slot = SlotRepo::find_by_id(&pool, slots[0]).await.unwrap().unwrap();
        assert_eq!(slot.state, SlotState::Available);

        let detail = store.find_ticket_detail(ticket.id).await.unwrap().unwrap();
        assert_eq!(detail.state, TicketState::Completed);
        assert_eq!(detail.slot_info.zone_name, "A");
        assert_eq!(detail.container_info.barcode.as_deref(), Some("CNT001"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn backwards_transition_writes_nothing(pool: PgPool) {
        let (slots, user, container) = seed(&pool, 1).await;
        let store = PgStore::new(pool.clone());
        let ticket = store
            .open_ticket(&new_ticket(slots[0], user, container), Utc::now())
            .await
            .unwrap()
            .unwrap();
        store
            .transition_ticket(ticket.id, TicketState::Validated, SlotReleasePolicy::Release, Utc::now())
            .await
            .unwrap();

        let result = store
            .transition_ticket(ticket.id, TicketState::Pending, SlotReleasePolicy::Release, Utc::now())
            .await;
        assert_matches!(
            result,
            Err(StoreError::Core(CoreError::InvalidTransition { .. }))
        );

        let reloaded = store.find_ticket(ticket.id).await.unwrap().unwrap();
        assert_eq!(reloaded.state, TicketState::Validated);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn held_slot_state_cannot_be_edited(pool: PgPool) {
        let (slots, user, container) = seed(&pool, 1).await;
        let store = PgStore::new(pool.clone());
        store
            .open_ticket(&new_ticket(slots[0], user, container), Utc::now())
            .await
            .unwrap()
            .unwrap();

        let input = UpdateSlot {
            row: None,
            column: None,
            level: None,
            state: Some(SlotState::Available),
            zone_id: None,
        };
        let result = store
            .update_slot(slots[0], &input, SlotReleasePolicy::Release)
            .await;
        assert_matches!(result, Err(StoreError::Core(CoreError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn referenced_slot_keeps_its_position(pool: PgPool) {
        let (slots, user, container) = seed(&pool, 1).await;
        let store = PgStore::new(pool.clone());
        let ticket = store
            .open_ticket(&new_ticket(slots[0], user, container), Utc::now())
            .await
            .unwrap()
            .unwrap();
        store
            .transition_ticket(ticket.id, TicketState::Completed, SlotReleasePolicy::Release, Utc::now())
            .await
            .unwrap();

        let input = UpdateSlot {
            row: None,
            column: Some(4),
            level: None,
            state: None,
            zone_id: None,
        };
        let result = store
            .update_slot(slots[0], &input, SlotReleasePolicy::Release)
            .await;
        assert_matches!(result, Err(StoreError::Core(CoreError::Conflict(_))));

        let slot = SlotRepo::find_by_id(&pool, slots[0]).await.unwrap().unwrap();
        assert_eq!(slot.column, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn zone_slots_come_in_allocation_order(pool: PgPool) {
        let (slots, _, _) = seed(&pool, 3).await;
        let store = PgStore::new(pool.clone());
        let zone: DbId = sqlx::query_scalar("SELECT id FROM zones WHERE name = 'A'")
            .fetch_one(&pool)
            .await
            .unwrap();
        let listed = store.list_zone_slots(zone).await.unwrap();
        let ids: Vec<DbId> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, slots);
    }
}
