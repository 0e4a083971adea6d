//! Database infrastructure: pooling (C1/C3's identity map and log tables)
//! plus schema initialization.
//!
//! # Modules
//! - `connection_pool`: sized SQLite pool with metrics
//! - `schema`: schema initialization and migrations

pub mod connection_pool;
pub mod schema;

pub use connection_pool::{ConnectionPool, ConnectionPoolConfig, PoolMetrics};
pub use schema::initialize_schema;
