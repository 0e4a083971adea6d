//! MediaMetadata — local snapshot of a TMDb title, used by the
//! filter-sourced collection engine (spec.md §3, §4.8).

use crate::domain::value_objects::ItemType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub tmdb_id: String,
    pub item_type: ItemType,
    pub title: String,
    pub release_year: Option<i32>,
    pub release_date: Option<String>,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub studios: Vec<String>,
    pub countries: Vec<String>,
    /// Present when the title is already in the media server's library.
    pub in_library: bool,
}

impl MediaMetadata {
    pub fn has_been_released(&self, today: &str) -> bool {
        match &self.release_date {
            Some(d) => d.as_str() <= today,
            None => false,
        }
    }
}
