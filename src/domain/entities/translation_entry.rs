//! TranslationEntry — `translation_cache` (spec.md §3, §4.2).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Precedence used when two cache writers race on the same source text
/// (spec.md §4.2: "manual edits beat AI beat engine translations").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TranslatorPrecedence {
    Engine = 0,
    Ai = 1,
    Manual = 2,
}

impl TranslatorPrecedence {
    pub fn of_engine(engine: &str) -> Self {
        match engine {
            "manual" => TranslatorPrecedence::Manual,
            "ai" => TranslatorPrecedence::Ai,
            _ => TranslatorPrecedence::Engine,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub source_text: String,
    pub translated_text: Option<String>,
    pub engine_used: String,
    pub updated_at: DateTime<Utc>,
}

impl TranslationEntry {
    /// Negative cache entries are prefixed `failed_<engine>` and carry no
    /// translated text (spec.md §4.2 step 5).
    pub fn is_negative(&self) -> bool {
        self.translated_text.is_none() && self.engine_used.starts_with("failed_")
    }

    pub fn negative(source_text: impl Into<String>, engine: &str, now: DateTime<Utc>) -> Self {
        Self {
            source_text: source_text.into(),
            translated_text: None,
            engine_used: format!("failed_{engine}"),
            updated_at: now,
        }
    }

    pub fn positive(
        source_text: impl Into<String>,
        translated_text: impl Into<String>,
        engine: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            translated_text: Some(translated_text.into()),
            engine_used: engine.into(),
            updated_at: now,
        }
    }

    /// Should `incoming` overwrite `self` in the cache? Higher precedence
    /// always wins; equal precedence keeps the existing (idempotent) row.
    pub fn should_be_replaced_by(&self, incoming_engine: &str) -> bool {
        TranslatorPrecedence::of_engine(incoming_engine)
            > TranslatorPrecedence::of_engine(&self.engine_used)
    }
}
