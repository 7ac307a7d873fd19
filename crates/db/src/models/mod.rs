//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Rust fields and SQL columns are English; serde renames keep the JSON
//! field names the web client already speaks.

pub mod access_level;
pub mod appointment;
pub mod container;
pub mod invoice;
pub mod payment;
pub mod role;
pub mod slot;
pub mod ticket;
pub mod user;
pub mod vessel;
pub mod zone;
