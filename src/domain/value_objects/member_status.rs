//! Per-member status tracked by list-sourced custom collections (spec.md §4.8).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    InLibrary,
    Missing,
    Subscribed,
    Unreleased,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberStatus::InLibrary => "in_library",
            MemberStatus::Missing => "missing",
            MemberStatus::Subscribed => "subscribed",
            MemberStatus::Unreleased => "unreleased",
        };
        write!(f, "{s}")
    }
}

/// Collection-level health, derived from its members' statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    HasMissing,
}

/// Derives collection health: `HasMissing` iff any member is `Missing`.
pub fn derive_health<'a>(statuses: impl IntoIterator<Item = &'a MemberStatus>) -> HealthStatus {
    if statuses.into_iter().any(|s| matches!(s, MemberStatus::Missing)) {
        HealthStatus::HasMissing
    } else {
        HealthStatus::Ok
    }
}
