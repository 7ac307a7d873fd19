//! Yard API server library.
//!
//! Exposes the building blocks (config, state, error handling, the ticket
//! engine, routes) so integration tests, the seed binary, and the server
//! entrypoint can all use them.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
