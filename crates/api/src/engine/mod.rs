//! Ticket engine.
//!
//! The slot allocator opens tickets on free slots; the lifecycle manager
//! moves tickets through their states and keeps slot occupancy in step.
//! Both talk to persistence only through [`yard_db::store::YardStore`], so
//! the same code runs against Postgres in production and the in-memory
//! store in tests.

pub mod allocator;
pub mod lifecycle;

pub use allocator::{SlotAllocator, TicketEntry};
pub use lifecycle::TicketLifecycle;

use yard_db::store::StoreError;

pub type EngineResult<T> = Result<T, StoreError>;
