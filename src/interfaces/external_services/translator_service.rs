//! Translator engine interface (C8, spec.md §4.2)
//!
//! One trait covers both the AI batch translator and the single-text
//! fallback engines (bing/google/baidu); they differ only in batch size.

use async_trait::async_trait;

use crate::shared::error::TranslationError;

#[async_trait]
pub trait TranslatorEngine: Send + Sync {
    /// Engine identifier stored alongside cache entries, e.g. `"bing"`,
    /// `"google"`, `"baidu"`, or the configured AI provider's name.
    fn name(&self) -> &str;

    /// Translates a batch of source texts in one round trip. A fallback
    /// engine that has no native batch endpoint may translate sequentially
    /// internally; the caller doesn't need to know which.
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutcome>, TranslationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub source_text: String,
    /// `None` when the engine returned nothing usable — the caller falls
    /// through to the next engine rather than caching a translation.
    pub translated_text: Option<String>,
}
