//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Writes that must share a
//! transaction take `&mut PgConnection` instead.

pub mod access_level_repo;
pub mod appointment_repo;
pub mod container_repo;
pub mod invoice_repo;
pub mod payment_repo;
pub mod role_repo;
pub mod slot_repo;
pub mod ticket_repo;
pub mod user_repo;
pub mod vessel_repo;
pub mod zone_repo;

pub use access_level_repo::AccessLevelRepo;
pub use appointment_repo::AppointmentRepo;
pub use container_repo::ContainerRepo;
pub use invoice_repo::InvoiceRepo;
pub use payment_repo::PaymentRepo;
pub use role_repo::RoleRepo;
pub use slot_repo::SlotRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
pub use vessel_repo::VesselRepo;
pub use zone_repo::ZoneRepo;
