//! Events raised by the webhook router (C13, spec.md §4.7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ItemType;

/// Raised when the media server reports a newly added library item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemAddedEvent {
    pub item_id: String,
    pub item_type: ItemType,
    pub timestamp: DateTime<Utc>,
}

impl ItemAddedEvent {
    pub fn new(item_id: String, item_type: ItemType) -> Self {
        Self { item_id, item_type, timestamp: Utc::now() }
    }
}

impl crate::interfaces::messaging::DomainEvent for ItemAddedEvent {
    fn event_type(&self) -> &'static str {
        "item_added"
    }
}

/// Raised when the media server reports that artwork for an item changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUpdatedEvent {
    pub item_id: String,
    pub item_type: ItemType,
    pub description_tag: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ImageUpdatedEvent {
    pub fn new(item_id: String, item_type: ItemType, description_tag: Option<String>) -> Self {
        Self { item_id, item_type, description_tag, timestamp: Utc::now() }
    }
}

impl crate::interfaces::messaging::DomainEvent for ImageUpdatedEvent {
    fn event_type(&self) -> &'static str {
        "image_updated"
    }
}

/// Raised once the cast processor finishes an item, whether or not it
/// flagged for review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastProcessedEvent {
    pub item_id: String,
    pub quality_score: f32,
    pub needs_review: bool,
    pub timestamp: DateTime<Utc>,
}

impl CastProcessedEvent {
    pub fn new(item_id: String, quality_score: f32, needs_review: bool) -> Self {
        Self { item_id, quality_score, needs_review, timestamp: Utc::now() }
    }
}

impl crate::interfaces::messaging::DomainEvent for CastProcessedEvent {
    fn event_type(&self) -> &'static str {
        "cast_processed"
    }
}
