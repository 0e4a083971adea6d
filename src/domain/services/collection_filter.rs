//! Evaluates a filter-sourced collection's predicate tree against a single
//! title's local metadata snapshot (spec.md §4.8).

use crate::domain::entities::MediaMetadata;
use crate::domain::value_objects::collection_definition::FilterNode;

pub fn matches(node: &FilterNode, metadata: &MediaMetadata) -> bool {
    match node {
        FilterNode::And(children) => children.iter().all(|c| matches(c, metadata)),
        FilterNode::Or(children) => children.iter().any(|c| matches(c, metadata)),
        FilterNode::Not(child) => !matches(child, metadata),
        FilterNode::GenreIs(genre) => metadata.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)),
        FilterNode::YearGte(year) => metadata.release_year.is_some_and(|y| y >= *year),
        FilterNode::YearLte(year) => metadata.release_year.is_some_and(|y| y <= *year),
        FilterNode::RatingGte(rating) => metadata.rating.is_some_and(|r| r >= *rating),
        FilterNode::ActorIs(actor) => metadata.actors.iter().any(|a| a.eq_ignore_ascii_case(actor)),
        FilterNode::DirectorIs(director) => metadata.directors.iter().any(|d| d.eq_ignore_ascii_case(director)),
        FilterNode::StudioIs(studio) => metadata.studios.iter().any(|s| s.eq_ignore_ascii_case(studio)),
        FilterNode::CountryIs(country) => metadata.countries.iter().any(|c| c.eq_ignore_ascii_case(country)),
    }
}
