pub mod access_levels;
pub mod appointments;
pub mod containers;
pub mod invoices;
pub mod payments;
pub mod roles;
pub mod slots;
pub mod tickets;
pub mod users;
pub mod vessels;
pub mod zones;
