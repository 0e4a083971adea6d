//! `CustomCollection.definition_json` payloads (spec.md §4.8).
//!
//! Two collection kinds share one table: list-sourced (an external list
//! provider resolves to TMDb IDs) and filter-sourced (a predicate tree over
//! `MediaMetadata`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionDefinition {
    List { provider: String, list_id: String },
    Filter { predicate: FilterNode },
}

/// A predicate tree over `MediaMetadata` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    GenreIs(String),
    YearGte(i32),
    YearLte(i32),
    RatingGte(f32),
    ActorIs(String),
    DirectorIs(String),
    StudioIs(String),
    CountryIs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let def = CollectionDefinition::Filter {
            predicate: FilterNode::And(vec![
                FilterNode::GenreIs("Animation".into()),
                FilterNode::YearGte(2015),
            ]),
        };
        let json = serde_json::to_string(&def).unwrap();
        let back: CollectionDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }
}
