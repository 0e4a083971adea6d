//! ActorSubscription — "track everything this person appears in"
//! (spec.md §3, driving the Actor Tracking task key).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSubscription {
    pub person_map_id: i64,
    pub display_name: String,
    pub subscribed_at: DateTime<Utc>,
    /// TMDb IDs already resolved for this person; re-checked each run so new
    /// credits surface without a full re-scan.
    pub known_credit_tmdb_ids: Vec<String>,
}
