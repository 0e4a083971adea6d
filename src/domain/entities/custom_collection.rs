//! CustomCollection / CollectionInfo — the filter- and list-sourced
//! collection engine's persisted state (spec.md §3, §4.8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CollectionDefinition, MemberStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCollection {
    pub collection_id: i64,
    pub name: String,
    pub definition: CollectionDefinition,
    pub emby_collection_id: Option<String>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// One membership row: a title this collection claims, and its current
/// fulfilment state. Only list-sourced collections track membership
/// per-item; filter-sourced collections recompute on each refresh instead
/// of persisting a row per member (spec.md §4.8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub collection_id: i64,
    pub tmdb_id: String,
    pub title: String,
    pub status: MemberStatus,
    /// Carried forward across refreshes: once a human (or the auto-subscribe
    /// task) subscribes a missing member, a re-resolved list must not forget
    /// it (spec.md §4.8: "preserves `subscribed` from prior snapshot").
    pub subscribed: bool,
}

impl CollectionInfo {
    /// Merge a freshly resolved member against the previous snapshot,
    /// preserving `subscribed` unless the member is now fulfilled.
    pub fn carry_forward(mut self, previous: Option<&CollectionInfo>) -> Self {
        if let Some(prev) = previous {
            if prev.subscribed && self.status == MemberStatus::Missing {
                self.subscribed = true;
            }
        }
        self
    }
}
