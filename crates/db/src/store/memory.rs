//! In-memory [`YardStore`] for tests and local experiments.
//!
//! All state sits behind one `tokio::sync::Mutex`; every trait method holds
//! the lock for its whole duration, which gives each operation the same
//! all-or-nothing behaviour as a Postgres transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use yard_core::error::CoreError;
use yard_core::slot::{validate_manual_change, validate_relocation, SlotState};
use yard_core::ticket::{holds_slot, plan_transition, SlotEffect, SlotReleasePolicy, TicketState};
use yard_core::types::{DbId, Timestamp};

use super::{
    container_already_admitted, ticket_not_found, AppliedTransition, StoreResult, YardStore,
};
use crate::models::slot::{Slot, UpdateSlot};
use crate::models::ticket::{ContainerInfo, NewTicket, SlotInfo, Ticket, TicketDetail, TicketFilter};
use crate::models::user::{CreateUser, User, UserResponse};
use crate::models::zone::Zone;

#[derive(Default)]
struct State {
    next_id: DbId,
    roles: BTreeMap<DbId, String>,
    access_levels: BTreeMap<DbId, String>,
    users: BTreeMap<DbId, User>,
    zones: BTreeMap<DbId, Zone>,
    slots: BTreeMap<DbId, Slot>,
    containers: BTreeMap<DbId, ContainerInfo>,
    tickets: BTreeMap<DbId, Ticket>,
}

impl State {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn detail(&self, ticket: &Ticket) -> Option<TicketDetail> {
        let slot = self.slots.get(&ticket.slot_id)?;
        let zone = self.zones.get(&slot.zone_id)?;
        let user = self.users.get(&ticket.user_id)?;
        let container = self.containers.get(&ticket.container_id)?;
        Some(TicketDetail {
            id: ticket.id,
            entered_at: ticket.entered_at,
            exited_at: ticket.exited_at,
            state: ticket.state,
            slot_id: ticket.slot_id,
            slot_info: SlotInfo {
                row: slot.row,
                column: slot.column,
                level: slot.level,
                zone_name: zone.name.clone(),
                zone_id: zone.id,
            },
            user_id: ticket.user_id,
            user_name: user.name.clone(),
            container_id: ticket.container_id,
            container_info: container.clone(),
            updated_at: ticket.updated_at,
        })
    }
}

/// A [`YardStore`] that keeps everything in process memory.
///
/// Ids are drawn from one shared sequence, so ids are unique across
/// entity kinds.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_role(&self, name: &str) -> DbId {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state.roles.insert(id, name.to_string());
        id
    }

    pub async fn add_access_level(&self, name: &str) -> DbId {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state.access_levels.insert(id, name.to_string());
        id
    }

    pub async fn add_user(&self, input: CreateUser) -> User {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let now = Utc::now();
        let user = User {
            id,
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            phone: input.phone,
            company: input.company,
            role_id: input.role_id,
            access_level_id: input.access_level_id,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(id, user.clone());
        user
    }

    pub async fn add_zone(&self, name: &str, capacity: i32) -> Zone {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let zone = Zone {
            id,
            name: name.to_string(),
            capacity,
        };
        state.zones.insert(id, zone.clone());
        zone
    }

    pub async fn add_slot(
        &self,
        zone_id: DbId,
        row: i32,
        column: i32,
        level: i32,
        slot_state: SlotState,
    ) -> Slot {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let slot = Slot {
            id,
            row,
            column,
            level,
            state: slot_state,
            zone_id,
        };
        state.slots.insert(id, slot.clone());
        slot
    }

    pub async fn add_container(&self, info: ContainerInfo) -> DbId {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state.containers.insert(id, info);
        id
    }

    pub async fn slot(&self, id: DbId) -> Option<Slot> {
        self.state.lock().await.slots.get(&id).cloned()
    }

    pub async fn tickets(&self) -> Vec<Ticket> {
        self.state.lock().await.tickets.values().cloned().collect()
    }

    /// Check the occupancy invariants over the whole store.
    ///
    /// - A ticket has an exit time exactly when it is completed, and the
    ///   exit never precedes the entry.
    /// - A slot carries at most one ticket that has not completed, and so
    ///   does a container.
    /// - Under `Release`, a slot is occupied exactly when such a ticket
    ///   exists. Under `Retain`, every slot that ever carried a ticket is
    ///   occupied and carries at most one in-progress or completed ticket.
    pub async fn check_invariants(&self, policy: SlotReleasePolicy) -> Result<(), String> {
        let state = self.state.lock().await;

        for ticket in state.tickets.values() {
            let completed = ticket.state == TicketState::Completed;
            if ticket.exited_at.is_some() != completed {
                return Err(format!(
                    "ticket {} in '{}' has exit time {:?}",
                    ticket.id, ticket.state, ticket.exited_at
                ));
            }
            if let Some(exit) = ticket.exited_at {
                if exit < ticket.entered_at {
                    return Err(format!("ticket {} exits before it enters", ticket.id));
                }
            }
        }

        let mut admitted = BTreeMap::new();
        for ticket in state.tickets.values().filter(|t| !t.state.is_terminal()) {
            *admitted.entry(ticket.container_id).or_insert(0usize) += 1;
        }
        if let Some((container, count)) = admitted.into_iter().find(|(_, count)| *count > 1) {
            return Err(format!("container {container} carries {count} active tickets"));
        }

        for slot in state.slots.values() {
            let on_slot: Vec<&Ticket> = state
                .tickets
                .values()
                .filter(|t| t.slot_id == slot.id)
                .collect();
            let active = on_slot.iter().filter(|t| !t.state.is_terminal()).count();
            if active > 1 {
                return Err(format!("slot {} carries {active} active tickets", slot.id));
            }

            let occupied = slot.state == SlotState::Occupied;
            match policy {
                SlotReleasePolicy::Release => {
                    if occupied != (active == 1) {
                        return Err(format!(
                            "slot {} is '{}' with {active} active ticket(s)",
                            slot.id, slot.state
                        ));
                    }
                }
                SlotReleasePolicy::Retain => {
                    let late = on_slot
                        .iter()
                        .filter(|t| {
                            matches!(t.state, TicketState::InProgress | TicketState::Completed)
                        })
                        .count();
                    if late > 1 {
                        return Err(format!(
                            "slot {} carries {late} in-progress or completed tickets",
                            slot.id
                        ));
                    }
                    if !on_slot.is_empty() && !occupied {
                        return Err(format!(
                            "slot {} carries tickets but is '{}'",
                            slot.id, slot.state
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl YardStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_response(&self, id: DbId) -> StoreResult<Option<UserResponse>> {
        let state = self.state.lock().await;
        let Some(user) = state.users.get(&id) else {
            return Ok(None);
        };
        Ok(Some(UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            company: user.company.clone(),
            role_id: user.role_id,
            role_name: state.roles.get(&user.role_id).cloned().unwrap_or_default(),
            access_level_id: user.access_level_id,
            access_level_name: state
                .access_levels
                .get(&user.access_level_id)
                .cloned()
                .unwrap_or_default(),
            updated_at: user.updated_at,
            created_at: user.created_at,
            is_active: user.is_active,
        }))
    }

    async fn find_slots(&self, ids: &[DbId]) -> StoreResult<Vec<Slot>> {
        let state = self.state.lock().await;
        Ok(state
            .slots
            .values()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn list_zone_slots(&self, zone_id: DbId) -> StoreResult<Vec<Slot>> {
        let state = self.state.lock().await;
        let mut slots: Vec<Slot> = state
            .slots
            .values()
            .filter(|s| s.zone_id == zone_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.level, s.row, s.column, s.id));
        Ok(slots)
    }

    async fn update_slot(
        &self,
        id: DbId,
        input: &UpdateSlot,
        policy: SlotReleasePolicy,
    ) -> StoreResult<Option<Slot>> {
        let mut state = self.state.lock().await;
        let Some(current) = state.slots.get(&id).cloned() else {
            return Ok(None);
        };

        let referenced = state.tickets.values().any(|t| t.slot_id == id);
        validate_relocation(input.moves(&current), referenced)?;

        if let Some(next) = input.state {
            let held = state
                .tickets
                .values()
                .any(|t| t.slot_id == id && holds_slot(t.state, policy));
            validate_manual_change(current.state, next, held)?;
        }

        let updated = Slot {
            id,
            row: input.row.unwrap_or(current.row),
            column: input.column.unwrap_or(current.column),
            level: input.level.unwrap_or(current.level),
            state: input.state.unwrap_or(current.state),
            zone_id: input.zone_id.unwrap_or(current.zone_id),
        };
        state.slots.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn open_ticket(&self, input: &NewTicket, now: Timestamp) -> StoreResult<Option<Ticket>> {
        let mut state = self.state.lock().await;

        if !state.users.contains_key(&input.user_id) {
            return Err(CoreError::NotFound {
                entity: "User",
                id: input.user_id,
            }
            .into());
        }
        if !state.containers.contains_key(&input.container_id) {
            return Err(CoreError::NotFound {
                entity: "Container",
                id: input.container_id,
            }
            .into());
        }

        if state
            .tickets
            .values()
            .any(|t| t.container_id == input.container_id && !t.state.is_terminal())
        {
            return Err(container_already_admitted(input.container_id));
        }

        match state.slots.get_mut(&input.slot_id) {
            Some(slot) if slot.state == SlotState::Available => slot.state = SlotState::Occupied,
            _ => return Ok(None),
        }

        let id = state.allocate_id();
        let ticket = Ticket {
            id,
            entered_at: input.entered_at,
            exited_at: None,
            state: TicketState::INITIAL,
            slot_id: input.slot_id,
            user_id: input.user_id,
            container_id: input.container_id,
            updated_at: Some(now),
        };
        state.tickets.insert(id, ticket.clone());
        Ok(Some(ticket))
    }

    async fn find_ticket(&self, id: DbId) -> StoreResult<Option<Ticket>> {
        Ok(self.state.lock().await.tickets.get(&id).cloned())
    }

    async fn find_ticket_detail(&self, id: DbId) -> StoreResult<Option<TicketDetail>> {
        let state = self.state.lock().await;
        Ok(state.tickets.get(&id).and_then(|t| state.detail(t)))
    }

    async fn list_ticket_details(&self, filter: &TicketFilter) -> StoreResult<Vec<TicketDetail>> {
        let state = self.state.lock().await;
        Ok(state
            .tickets
            .values()
            .filter(|t| filter.matches(t))
            .filter_map(|t| state.detail(t))
            .collect())
    }

    async fn transition_ticket(
        &self,
        id: DbId,
        target: TicketState,
        policy: SlotReleasePolicy,
        now: Timestamp,
    ) -> StoreResult<AppliedTransition> {
        let mut state = self.state.lock().await;

        let previous = state
            .tickets
            .get(&id)
            .cloned()
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

        let ticket = Ticket {
            state: plan.to,
            exited_at: plan.exited_at,
            updated_at: Some(now),
            ..previous.clone()
        };
        state.tickets.insert(id, ticket.clone());

        if let Some(slot) = state.slots.get_mut(&previous.slot_id) {
            match plan.slot_effect {
                SlotEffect::Unchanged => {}
                SlotEffect::Occupy => slot.state = SlotState::Occupied,
                SlotEffect::Release => {
                    if slot.state == SlotState::Occupied {
                        slot.state = SlotState::Available;
                    }
                }
            }
        }

        Ok(AppliedTransition {
            previous,
            ticket,
            plan,
        })
    }
}
