//! Persistence Layer
//!
//! SQLite-backed implementations of the domain repository traits.

pub mod sqlite;
