//! External identity keys
//!
//! The four catalogs this service reconciles each contribute one external
//! ID field on `PersonIdentity`. This module centralizes validation and the
//! fixed lookup precedence used by `FindByAnyId` (tmdb, emby, imdb, douban).

use serde::{Deserialize, Serialize};

/// Maximum length (in bytes) of any external ID value.
pub const MAX_EXTERNAL_ID_LEN: usize = 64;

/// One of the four external catalogs a person can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalIdKind {
    Tmdb,
    Emby,
    Imdb,
    Douban,
}

impl ExternalIdKind {
    /// Lookup precedence used by `FindByAnyId` (spec.md §4.1).
    pub const PRECEDENCE: [ExternalIdKind; 4] = [
        ExternalIdKind::Tmdb,
        ExternalIdKind::Emby,
        ExternalIdKind::Imdb,
        ExternalIdKind::Douban,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            ExternalIdKind::Tmdb => "tmdb_person_id",
            ExternalIdKind::Emby => "emby_person_id",
            ExternalIdKind::Imdb => "imdb_id",
            ExternalIdKind::Douban => "douban_celebrity_id",
        }
    }
}

/// A validated, trimmed external ID value, or `None` if the input normalized
/// to empty. Normalization step 1 of the upsert algorithm: trim, empty→null.
pub fn normalize_external_id(raw: Option<&str>) -> Result<Option<String>, ExternalIdError> {
    let Some(raw) = raw else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() > MAX_EXTERNAL_ID_LEN {
        return Err(ExternalIdError::TooLong(trimmed.len()));
    }
    Ok(Some(trimmed.to_string()))
}

/// Normalizes a display name the same way: trim, empty→null.
pub fn normalize_name(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ExternalIdError {
    #[error("external id exceeds {} characters: got {0}", MAX_EXTERNAL_ID_LEN)]
    TooLong(usize),
}
