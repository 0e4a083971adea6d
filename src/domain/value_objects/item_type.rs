//! Media item type, as reported by the media-server adapter (§6).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    Movie,
    Series,
    Episode,
    Season,
}

impl ItemType {
    /// Whether the cast processor runs Douban enrichment for this type
    /// (spec.md §4.3 step 2: "If item type ∈ {Movie, Series}").
    pub fn is_douban_eligible(&self) -> bool {
        matches!(self, ItemType::Movie | ItemType::Series)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Movie => "Movie",
            ItemType::Series => "Series",
            ItemType::Episode => "Episode",
            ItemType::Season => "Season",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
