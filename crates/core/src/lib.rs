//! Domain rules for the container yard: identifiers, errors, the ticket
//! state machine, and slot occupancy policy.
//!
//! This crate performs no I/O so the same rules back both the Postgres and
//! the in-memory entity stores.

pub mod error;
pub mod roles;
pub mod slot;
pub mod ticket;
pub mod types;
pub mod wire;
