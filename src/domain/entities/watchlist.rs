//! Watchlist — titles awaiting release, polled by the watchlist processor
//! (spec.md §3, §4.7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ItemType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub tmdb_id: String,
    pub item_type: ItemType,
    pub title: String,
    pub added_at: DateTime<Utc>,
    /// Cleared once the item lands in the media server library.
    pub resolved: bool,
}
