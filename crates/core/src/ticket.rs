//! Ticket lifecycle state machine.
//!
//! A ticket records a container's stay in the yard. It moves strictly
//! forward through `Pending -> Validated -> Queued -> InProgress -> Completed`,
//! may jump straight to `Completed` from any earlier state, and never leaves
//! `Completed`. [`plan_transition`] decides what a requested change does to
//! the ticket and to the slot it occupies; the entity store applies the plan
//! atomically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::wire::label_key;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketState {
    Pending,
    Validated,
    Queued,
    InProgress,
    Completed,
}

impl TicketState {
    /// Every state, in lifecycle order.
    pub const ALL: [TicketState; 5] = [
        TicketState::Pending,
        TicketState::Validated,
        TicketState::Queued,
        TicketState::InProgress,
        TicketState::Completed,
    ];

    /// State assigned to every newly opened ticket.
    pub const INITIAL: TicketState = TicketState::Pending;

    /// Canonical label, as stored and as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketState::Pending => "Pendiente",
            TicketState::Validated => "Validado",
            TicketState::Queued => "En Cola",
            TicketState::InProgress => "En Proceso",
            TicketState::Completed => "Completado",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == TicketState::Completed
    }

    /// The single forward step from this state, if any.
    pub fn next(self) -> Option<TicketState> {
        match self {
            TicketState::Pending => Some(TicketState::Validated),
            TicketState::Validated => Some(TicketState::Queued),
            TicketState::Queued => Some(TicketState::InProgress),
            TicketState::InProgress => Some(TicketState::Completed),
            TicketState::Completed => None,
        }
    }

    /// Parse a state label. Accepts the canonical Spanish labels and the
    /// English variant names, ignoring case, spaces, `_` and `-`.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let state = match label_key(input).as_str() {
            "pendiente" | "pending" => TicketState::Pending,
            "validado" | "validated" => TicketState::Validated,
            "encola" | "queued" => TicketState::Queued,
            "enproceso" | "inprogress" => TicketState::InProgress,
            "completado" | "completed" => TicketState::Completed,
            _ => {
                return Err(CoreError::Validation(format!(
                    "Unknown ticket state '{input}'. Must be one of: {}",
                    Self::ALL.map(TicketState::as_str).join(", ")
                )))
            }
        };
        Ok(state)
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketState::parse(s)
    }
}

impl TryFrom<String> for TicketState {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TicketState::parse(&value)
    }
}

impl Serialize for TicketState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TicketState::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Slot release policy
// ---------------------------------------------------------------------------

/// What completing a ticket does to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotReleasePolicy {
    /// Completion returns the slot to `Available`.
    #[default]
    Release,
    /// Completion leaves the slot `Occupied` (legacy behaviour).
    Retain,
}

impl SlotReleasePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotReleasePolicy::Release => "release",
            SlotReleasePolicy::Retain => "retain",
        }
    }

    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match label_key(input).as_str() {
            "release" => Ok(SlotReleasePolicy::Release),
            "retain" => Ok(SlotReleasePolicy::Retain),
            _ => Err(CoreError::Validation(format!(
                "Unknown slot release policy '{input}'. Must be 'release' or 'retain'"
            ))),
        }
    }
}

/// Whether a ticket in `state` still holds its slot under `policy`.
///
/// Non-completed tickets always hold their slot; completed ones only when
/// completion does not release it.
pub fn holds_slot(state: TicketState, policy: SlotReleasePolicy) -> bool {
    !state.is_terminal() || policy == SlotReleasePolicy::Retain
}

// ---------------------------------------------------------------------------
// Transition planning
// ---------------------------------------------------------------------------

/// Change to apply to the ticket's slot alongside a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEffect {
    Unchanged,
    /// Mark the slot `Occupied`.
    Occupy,
    /// Return the slot to `Available`.
    Release,
}

/// The outcome of planning one requested state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: TicketState,
    pub to: TicketState,
    /// Exit timestamp the ticket must carry after the transition.
    pub exited_at: Option<Timestamp>,
    pub slot_effect: SlotEffect,
    /// Set when the transition skipped intermediate states on its way to
    /// `Completed`.
    pub lenient: bool,
}

impl TransitionPlan {
    /// A same-state request writes nothing.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Validate that `from -> to` is a lifecycle transition.
///
/// Returns `Ok(true)` for the lenient direct-to-`Completed` path,
/// `Ok(false)` for a regular single step or a same-state request.
pub fn validate_transition(from: TicketState, to: TicketState) -> Result<bool, CoreError> {
    if from == to || from.next() == Some(to) {
        return Ok(false);
    }
    if to == TicketState::Completed && !from.is_terminal() {
        return Ok(true);
    }
    Err(CoreError::InvalidTransition {
        from: from.as_str().to_string(),
        to: to.as_str().to_string(),
    })
}

/// Plan the transition of a ticket currently in `current` to `target`.
///
/// Exit timestamps are never moved once set, and a fresh one is clamped to
/// `entered_at` so it can never precede the entry.
pub fn plan_transition(
    current: TicketState,
    entered_at: Timestamp,
    exited_at: Option<Timestamp>,
    target: TicketState,
    policy: SlotReleasePolicy,
    now: Timestamp,
) -> Result<TransitionPlan, CoreError> {
    let lenient = validate_transition(current, target)?;

    if current == target {
        return Ok(TransitionPlan {
            from: current,
            to: target,
            exited_at,
            slot_effect: SlotEffect::Unchanged,
            lenient: false,
        });
    }

    let (exited_at, slot_effect) = match target {
        TicketState::Completed => {
            let exit = exited_at.unwrap_or_else(|| now.max(entered_at));
            let effect = match policy {
                SlotReleasePolicy::Release => SlotEffect::Release,
                SlotReleasePolicy::Retain => SlotEffect::Occupy,
            };
            (Some(exit), effect)
        }
        TicketState::InProgress => (None, SlotEffect::Occupy),
        _ => (None, SlotEffect::Unchanged),
    };

    Ok(TransitionPlan {
        from: current,
        to: target,
        exited_at,
        slot_effect,
        lenient,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
