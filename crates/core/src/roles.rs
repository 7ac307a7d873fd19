//! Well-known role and access-level names.
//!
//! These must match the rows created by the `yard-seed` binary.

pub const ROLE_ADMIN: &str = "ADMINISTRADOR";
pub const ROLE_OPERATOR: &str = "OPERARIO";
pub const ROLE_CLIENT: &str = "CLIENTE";

pub const LEVEL_FULL: &str = "Total";
pub const LEVEL_OPERATIONAL: &str = "Operativo";
pub const LEVEL_BASIC: &str = "Básico";
