//! PersonIdentity entity — `person_identity_map`, authoritative (spec.md §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reconciled person identity, keyed by up to four external catalog IDs.
///
/// Invariant: for each non-null external ID field, at most one row holds
/// it. A row with no external ID is permitted only transiently, to host an
/// unresolved name before a later upsert supplies an ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonIdentity {
    pub map_id: i64,
    pub primary_name: Option<String>,
    pub tmdb_person_id: Option<String>,
    pub emby_person_id: Option<String>,
    pub imdb_id: Option<String>,
    pub douban_celebrity_id: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_updated_at: DateTime<Utc>,
}

impl PersonIdentity {
    /// A not-yet-persisted row (`map_id` is assigned by the store on insert).
    pub fn new_unsaved(candidate: &UpsertCandidate) -> Self {
        Self {
            map_id: 0,
            primary_name: candidate.name.clone(),
            tmdb_person_id: candidate.tmdb_person_id.clone(),
            emby_person_id: candidate.emby_person_id.clone(),
            imdb_id: candidate.imdb_id.clone(),
            douban_celebrity_id: candidate.douban_celebrity_id.clone(),
            last_synced_at: None,
            last_updated_at: Utc::now(),
        }
    }

    /// Whether this row carries at least one external ID.
    pub fn has_any_external_id(&self) -> bool {
        self.tmdb_person_id.is_some()
            || self.emby_person_id.is_some()
            || self.imdb_id.is_some()
            || self.douban_celebrity_id.is_some()
    }
}

/// Normalized input to `Upsert` (spec.md §4.1). Fields are already trimmed
/// and empty-to-null normalized by the time this reaches the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertCandidate {
    pub name: Option<String>,
    pub tmdb_person_id: Option<String>,
    pub emby_person_id: Option<String>,
    pub imdb_id: Option<String>,
    pub douban_celebrity_id: Option<String>,
}

impl UpsertCandidate {
    pub fn has_any_id(&self) -> bool {
        self.tmdb_person_id.is_some()
            || self.emby_person_id.is_some()
            || self.imdb_id.is_some()
            || self.douban_celebrity_id.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && !self.has_any_id()
    }
}
