//! Yard slot occupancy states and selection policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::DbId;
use crate::wire::label_key;

/// Occupancy state of a storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    Available,
    Occupied,
    /// Taken out of service by the yard; never allocated.
    Maintenance,
}

impl SlotState {
    pub const ALL: [SlotState; 3] = [
        SlotState::Available,
        SlotState::Occupied,
        SlotState::Maintenance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotState::Available => "Disponible",
            SlotState::Occupied => "Ocupado",
            SlotState::Maintenance => "Mantenimiento",
        }
    }

    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match label_key(input).as_str() {
            "disponible" | "available" => Ok(SlotState::Available),
            "ocupado" | "occupied" => Ok(SlotState::Occupied),
            "mantenimiento" | "maintenance" => Ok(SlotState::Maintenance),
            _ => Err(CoreError::Validation(format!(
                "Unknown slot state '{input}'. Must be one of: {}",
                Self::ALL.map(SlotState::as_str).join(", ")
            ))),
        }
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotState::parse(s)
    }
}

impl TryFrom<String> for SlotState {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SlotState::parse(&value)
    }
}

impl Serialize for SlotState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SlotState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SlotState::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Pick the first candidate, in the given order, whose state is `Available`.
///
/// `excluded` lists slots already lost to a concurrent allocation in this
/// request; they are skipped even if their recorded state says `Available`.
/// There is no fallback: if nothing is available the result is `None`.
pub fn select_available(candidates: &[(DbId, SlotState)], excluded: &[DbId]) -> Option<DbId> {
    candidates
        .iter()
        .find(|(id, state)| *state == SlotState::Available && !excluded.contains(id))
        .map(|(id, _)| *id)
}

/// Validate a state requested for a slot that is being provisioned.
pub fn validate_initial_state(state: SlotState) -> Result<(), CoreError> {
    if state == SlotState::Occupied {
        return Err(CoreError::Validation(
            "New slots cannot start occupied; open a ticket to occupy a slot".into(),
        ));
    }
    Ok(())
}

/// Validate a manual (non-ticket) change of slot state.
///
/// Occupancy follows tickets: nobody may set `Occupied` by hand, and a slot
/// held by a ticket cannot change state at all until the ticket lets go.
pub fn validate_manual_change(
    current: SlotState,
    next: SlotState,
    held_by_ticket: bool,
) -> Result<(), CoreError> {
    if current == next {
        return Ok(());
    }
    if held_by_ticket {
        return Err(CoreError::Conflict(format!(
            "Slot is held by an active ticket; its state cannot change from '{current}' to '{next}'"
        )));
    }
    if next == SlotState::Occupied {
        return Err(CoreError::Validation(
            "Slots become occupied only through tickets".into(),
        ));
    }
    Ok(())
}

/// Validate a change of slot coordinates or zone.
///
/// Tickets name the slot they were made on, so a slot referenced by any
/// ticket, completed or not, stays where it is.
pub fn validate_relocation(moves: bool, referenced_by_tickets: bool) -> Result<(), CoreError> {
    if moves && referenced_by_tickets {
        return Err(CoreError::Conflict(
            "Slot is referenced by tickets; its coordinates and zone cannot change".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_accepts_spanish_and_english() {
        assert_eq!(SlotState::parse("Disponible").unwrap(), SlotState::Available);
        assert_eq!(SlotState::parse("OCUPADO").unwrap(), SlotState::Occupied);
        assert_eq!(SlotState::parse("maintenance").unwrap(), SlotState::Maintenance);
        assert!(SlotState::parse("ok").is_err());
    }

    #[test]
    fn selection_respects_caller_order() {
        let candidates = [
            (3, SlotState::Occupied),
            (7, SlotState::Available),
            (1, SlotState::Available),
        ];
        assert_eq!(select_available(&candidates, &[]), Some(7));
    }

    #[test]
    fn selection_never_returns_an_unavailable_slot() {
        let candidates = [
            (1, SlotState::Occupied),
            (2, SlotState::Maintenance),
            (3, SlotState::Available),
        ];
        assert_eq!(select_available(&candidates, &[]), Some(3));
    }

    #[test]
    fn selection_fails_closed_when_nothing_is_available() {
        let candidates = [(1, SlotState::Occupied), (2, SlotState::Maintenance)];
        assert_eq!(select_available(&candidates, &[]), None);
        assert_eq!(select_available(&[], &[]), None);
    }

    #[test]
    fn selection_skips_excluded_slots() {
        let candidates = [(1, SlotState::Available), (2, SlotState::Available)];
        assert_eq!(select_available(&candidates, &[1]), Some(2));
        assert_eq!(select_available(&candidates, &[1, 2]), None);
    }

    #[test]
    fn new_slots_cannot_start_occupied() {
        assert!(validate_initial_state(SlotState::Available).is_ok());
        assert!(validate_initial_state(SlotState::Maintenance).is_ok());
        assert_matches!(
            validate_initial_state(SlotState::Occupied),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn free_slot_can_toggle_maintenance() {
        assert!(validate_manual_change(SlotState::Available, SlotState::Maintenance, false).is_ok());
        assert!(validate_manual_change(SlotState::Maintenance, SlotState::Available, false).is_ok());
    }

    #[test]
    fn held_slot_state_is_locked() {
        assert_matches!(
            validate_manual_change(SlotState::Occupied, SlotState::Available, true),
            Err(CoreError::Conflict(_))
        );
        assert!(validate_manual_change(SlotState::Occupied, SlotState::Occupied, true).is_ok());
    }

    #[test]
    fn occupied_cannot_be_set_by_hand() {
        assert_matches!(
            validate_manual_change(SlotState::Available, SlotState::Occupied, false),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn referenced_slot_stays_put() {
        assert_matches!(validate_relocation(true, true), Err(CoreError::Conflict(_)));
        assert!(validate_relocation(false, true).is_ok());
        assert!(validate_relocation(true, false).is_ok());
    }
}
