//! Credential handling: password hashing and the login credential check.

pub mod credentials;
pub mod password;
