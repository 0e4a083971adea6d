// Infrastructure Layer
//
// This module contains all infrastructure implementations including:
// - Persistence (SQLite repositories)
// - External service adapters (media server, TMDb, Douban, translators)
// - Filesystem adapters (local cache reader, override writer)
// - Messaging (event bus)
// - Task management
// - Database connection pooling

pub mod database;
pub mod external;
pub mod filesystem;
pub mod jobs;
pub mod messaging;
pub mod persistence;
