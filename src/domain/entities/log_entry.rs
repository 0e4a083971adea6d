//! ProcessedLog / FailedLog — audit trail for C9 runs (spec.md §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedLogEntry {
    pub item_id: String,
    pub item_name: String,
    pub quality_score: f32,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedLogEntry {
    pub item_id: String,
    pub item_name: String,
    pub reason: String,
    pub failed_at: DateTime<Utc>,
}

impl ProcessedLogEntry {
    pub fn needs_review(&self, min_score_for_review: f32) -> bool {
        self.quality_score < min_score_for_review
    }
}
