//! In-memory cast member shape flowing through the cast processor (C9).
//!
//! This is not a persisted table; it is the unit the processor reads from
//! the media-server payload, enriches from Douban, and writes back into the
//! override cache JSON (spec.md §4.3).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Stable identity, when the server or catalog provides one.
    pub tmdb_person_id: Option<String>,
    pub douban_celebrity_id: Option<String>,
    pub emby_person_id: Option<String>,

    pub name: String,
    pub original_name: Option<String>,
    pub role: String,

    /// Display order from the source payload; `None` sorts last (spec.md
    /// treats missing/negative order as 999).
    pub order: Option<i32>,

    pub profile_path: Option<String>,
}

impl CastMember {
    /// Effective sort key for truncation and final ordering (spec.md §4.3
    /// step 3: "null or negative order is treated as 999").
    pub fn sort_order(&self) -> i32 {
        match self.order {
            Some(o) if o >= 0 => o,
            _ => 999,
        }
    }
}
