//! The closed set of task keys the task manager (C12) accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKey {
    FullScan,
    PopulateMetadata,
    SyncPersonMap,
    ProcessWatchlist,
    EnrichAliases,
    ActorCleanup,
    RefreshCollections,
    AutoSubscribe,
    ActorTracking,
    CustomCollections,
}

impl TaskKey {
    pub const ALL: [TaskKey; 10] = [
        TaskKey::FullScan,
        TaskKey::PopulateMetadata,
        TaskKey::SyncPersonMap,
        TaskKey::ProcessWatchlist,
        TaskKey::EnrichAliases,
        TaskKey::ActorCleanup,
        TaskKey::RefreshCollections,
        TaskKey::AutoSubscribe,
        TaskKey::ActorTracking,
        TaskKey::CustomCollections,
    ];

    /// Human-readable name, as surfaced in task status.
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskKey::FullScan => "Full library scan",
            TaskKey::PopulateMetadata => "Populate metadata cache",
            TaskKey::SyncPersonMap => "Sync person identity map",
            TaskKey::ProcessWatchlist => "Process watchlist",
            TaskKey::EnrichAliases => "Enrich actor identities",
            TaskKey::ActorCleanup => "Actor cleanup",
            TaskKey::RefreshCollections => "Refresh custom collections",
            TaskKey::AutoSubscribe => "Auto-subscribe missing items",
            TaskKey::ActorTracking => "Actor subscription tracking",
            TaskKey::CustomCollections => "Rebuild custom collections",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKey::FullScan => "full-scan",
            TaskKey::PopulateMetadata => "populate-metadata",
            TaskKey::SyncPersonMap => "sync-person-map",
            TaskKey::ProcessWatchlist => "process-watchlist",
            TaskKey::EnrichAliases => "enrich-aliases",
            TaskKey::ActorCleanup => "actor-cleanup",
            TaskKey::RefreshCollections => "refresh-collections",
            TaskKey::AutoSubscribe => "auto-subscribe",
            TaskKey::ActorTracking => "actor-tracking",
            TaskKey::CustomCollections => "custom-collections",
        }
    }

    pub fn parse(key: &str) -> Option<TaskKey> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for key in TaskKey::ALL {
            assert_eq!(TaskKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(TaskKey::parse("not-a-task"), None);
    }
}
