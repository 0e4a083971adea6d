//! Translation service (C2 + C8): the cache-then-cascade lookup described in
//! spec.md §4.2.
//!
//! 1. Skip translation entirely for empty, already-Chinese, or bare-initial
//!    text (`should_bypass_translation`).
//! 2. A cached negative (`failed_<engine>`) entry short-circuits to "no
//!    translation" without calling any engine.
//! 3. A cached positive entry is returned as-is.
//! 4. Otherwise the AI batch translator runs first; any texts it could not
//!    translate fall through to the ordered list of fallback engines, each
//!    tried until one returns a non-empty result that differs
//!    (case-insensitively) from the source text.
//! 5. Final misses are cached as negative entries so the next run skips the
//!    network round trip.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::entities::TranslationEntry;
use crate::domain::repositories::TranslationRepository;
use crate::domain::services::should_bypass_translation;
use crate::interfaces::external_services::TranslatorEngine;
use crate::shared::error::TranslationError;

pub struct TranslationService {
    repository: Arc<dyn TranslationRepository>,
    ai_engine: Arc<dyn TranslatorEngine>,
    fallback_engines: Vec<Arc<dyn TranslatorEngine>>,
}

impl TranslationService {
    pub fn new(
        repository: Arc<dyn TranslationRepository>,
        ai_engine: Arc<dyn TranslatorEngine>,
        fallback_engines: Vec<Arc<dyn TranslatorEngine>>,
    ) -> Self {
        Self { repository, ai_engine, fallback_engines }
    }

    /// Resolves the Chinese text for every entry in `texts`, in order.
    /// Entries that should bypass translation pass through unchanged.
    pub async fn translate_many(&self, texts: &[String]) -> Result<Vec<String>, TranslationError> {
        let mut results: Vec<Option<String>> = vec![None; texts.len()];
        let mut pending_indices = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if should_bypass_translation(text) {
                results[i] = Some(text.clone());
                continue;
            }
            pending_indices.push(i);
        }

        if pending_indices.is_empty() {
            return Ok(results.into_iter().map(|r| r.unwrap_or_default()).collect());
        }

        let pending_texts: Vec<String> = pending_indices.iter().map(|&i| texts[i].clone()).collect();
        let cached = self.repository.find_many(&pending_texts).await?;
        let cache_by_text: HashMap<&str, &TranslationEntry> =
            cached.iter().map(|entry| (entry.source_text.as_str(), entry)).collect();

        let mut uncached_indices = Vec::new();
        for &i in &pending_indices {
            match cache_by_text.get(texts[i].as_str()) {
                Some(entry) if entry.is_negative() => results[i] = Some(texts[i].clone()),
                Some(entry) => results[i] = entry.translated_text.clone(),
                None => uncached_indices.push(i),
            }
        }

        if !uncached_indices.is_empty() {
            let resolved = self.resolve_via_engines(&uncached_indices, texts).await?;
            for (i, translated) in uncached_indices.into_iter().zip(resolved) {
                results[i] = Some(translated.unwrap_or_else(|| texts[i].clone()));
            }
        }

        Ok(results.into_iter().map(|r| r.unwrap_or_default()).collect())
    }

    async fn resolve_via_engines(
        &self,
        indices: &[usize],
        texts: &[String],
    ) -> Result<Vec<Option<String>>, TranslationError> {
        let batch: Vec<String> = indices.iter().map(|&i| texts[i].clone()).collect();
        let mut resolved: Vec<Option<String>> = vec![None; batch.len()];
        let mut still_pending: Vec<usize> = (0..batch.len()).collect();

        if let Ok(outcomes) = self.ai_engine.translate_batch(&batch).await {
            still_pending = self.apply_outcomes(&batch, outcomes, &mut resolved, still_pending, self.ai_engine.name()).await?;
        } else {
            warn!("ai translator unavailable, falling through to fallback engines");
        }

        for engine in &self.fallback_engines {
            if still_pending.is_empty() {
                break;
            }
            let remaining_texts: Vec<String> = still_pending.iter().map(|&i| batch[i].clone()).collect();
            match engine.translate_batch(&remaining_texts).await {
                Ok(outcomes) => {
                    still_pending = self.apply_outcomes(&remaining_texts, outcomes, &mut resolved, still_pending, engine.name()).await?;
                }
                Err(err) => debug!(engine = engine.name(), error = %err, "fallback translation engine failed"),
            }
        }

        for &i in &still_pending {
            let now = Utc::now();
            let entry = TranslationEntry::negative(batch[i].clone(), "all_engines", now);
            self.repository.upsert(entry).await?;
        }

        Ok(resolved)
    }

    /// Writes successful outcomes into `resolved`/the cache and returns the
    /// indices (into `still_pending`'s original index space) still missing a
    /// translation after this engine's pass.
    async fn apply_outcomes(
        &self,
        attempted_texts: &[String],
        outcomes: Vec<crate::interfaces::external_services::TranslationOutcome>,
        resolved: &mut [Option<String>],
        still_pending: Vec<usize>,
        engine_name: &str,
    ) -> Result<Vec<usize>, TranslationError> {
        let mut outcome_by_text: HashMap<&str, Option<String>> = HashMap::new();
        for outcome in &outcomes {
            outcome_by_text.insert(outcome.source_text.as_str(), outcome.translated_text.clone());
        }

        let mut next_pending = Vec::new();
        for (position, &batch_index) in still_pending.iter().enumerate() {
            let source_text = &attempted_texts[position];
            match outcome_by_text.get(source_text.as_str()).cloned().flatten() {
                Some(translated) => {
                    let now = Utc::now();
                    let entry = TranslationEntry::positive(source_text.clone(), translated.clone(), engine_name, now);
                    self.repository.upsert(entry).await?;
                    resolved[batch_index] = Some(translated);
                }
                None => next_pending.push(batch_index),
            }
        }
        Ok(next_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::interfaces::external_services::TranslationOutcome;
    use crate::shared::error::RepositoryError;

    struct InMemoryTranslationRepository {
        entries: Mutex<HashMap<String, TranslationEntry>>,
    }

    impl InMemoryTranslationRepository {
        fn new() -> Self {
            Self { entries: Mutex::new(HashMap::new()) }
        }
    }

    #[async_trait]
    impl TranslationRepository for InMemoryTranslationRepository {
        async fn find(&self, source_text: &str) -> Result<Option<TranslationEntry>, RepositoryError> {
            Ok(self.entries.lock().unwrap().get(source_text).cloned())
        }

        async fn find_many(&self, source_texts: &[String]) -> Result<Vec<TranslationEntry>, RepositoryError> {
            let guard = self.entries.lock().unwrap();
            Ok(source_texts.iter().filter_map(|t| guard.get(t).cloned()).collect())
        }

        async fn upsert(&self, entry: TranslationEntry) -> Result<(), RepositoryError> {
            let mut guard = self.entries.lock().unwrap();
            match guard.get(&entry.source_text) {
                Some(existing) if !existing.should_be_replaced_by(&entry.engine_used) => {}
                _ => {
                    guard.insert(entry.source_text.clone(), entry);
                }
            }
            Ok(())
        }
    }

    struct StubEngine {
        name: &'static str,
        responses: HashMap<&'static str, &'static str>,
    }

    #[async_trait]
    impl TranslatorEngine for StubEngine {
        fn name(&self) -> &str {
            self.name
        }

        async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutcome>, TranslationError> {
            Ok(texts
                .iter()
                .map(|t| TranslationOutcome {
                    source_text: t.clone(),
                    translated_text: self.responses.get(t.as_str()).map(|s| s.to_string()),
                })
                .collect())
        }
    }

    fn ai_engine(responses: &[(&'static str, &'static str)]) -> Arc<dyn TranslatorEngine> {
        Arc::new(StubEngine { name: "ai", responses: responses.iter().cloned().collect() })
    }

    fn fallback_engine(name: &'static str, responses: &[(&'static str, &'static str)]) -> Arc<dyn TranslatorEngine> {
        Arc::new(StubEngine { name, responses: responses.iter().cloned().collect() })
    }

    #[tokio::test]
    async fn bypasses_text_already_in_chinese() {
        let repo = Arc::new(InMemoryTranslationRepository::new());
        let service = TranslationService::new(repo, ai_engine(&[]), vec![]);
        let result = service.translate_many(&["张译".to_string()]).await.unwrap();
        assert_eq!(result, vec!["张译"]);
    }

    #[tokio::test]
    async fn ai_engine_translation_is_cached_and_reused() {
        let repo = Arc::new(InMemoryTranslationRepository::new());
        let service = TranslationService::new(repo.clone(), ai_engine(&[("Tom Hardy", "汤姆·哈迪")]), vec![]);

        let result = service.translate_many(&["Tom Hardy".to_string()]).await.unwrap();
        assert_eq!(result, vec!["汤姆·哈迪"]);

        let cached = repo.find("Tom Hardy").await.unwrap().unwrap();
        assert_eq!(cached.engine_used, "ai");
        assert_eq!(cached.translated_text.as_deref(), Some("汤姆·哈迪"));
    }

    #[tokio::test]
    async fn falls_through_to_next_engine_when_ai_has_no_answer() {
        let repo = Arc::new(InMemoryTranslationRepository::new());
        let service = TranslationService::new(
            repo,
            ai_engine(&[]),
            vec![fallback_engine("google", &[]), fallback_engine("bing", &[("Idris Elba", "伊德里斯·艾尔巴")])],
        );

        let result = service.translate_many(&["Idris Elba".to_string()]).await.unwrap();
        assert_eq!(result, vec!["伊德里斯·艾尔巴"]);
    }

    #[tokio::test]
    async fn all_engines_failing_caches_negative_entry_and_returns_source() {
        let repo = Arc::new(InMemoryTranslationRepository::new());
        let service = TranslationService::new(repo.clone(), ai_engine(&[]), vec![fallback_engine("google", &[])]);

        let result = service.translate_many(&["Xyzzy Plover".to_string()]).await.unwrap();
        assert_eq!(result, vec!["Xyzzy Plover"]);

        let cached = repo.find("Xyzzy Plover").await.unwrap().unwrap();
        assert!(cached.is_negative());
    }

    #[tokio::test]
    async fn cached_negative_entry_short_circuits_without_calling_engines() {
        let repo = Arc::new(InMemoryTranslationRepository::new());
        repo.upsert(TranslationEntry::negative("Already Failed", "all_engines", Utc::now())).await.unwrap();

        let service = TranslationService::new(repo, ai_engine(&[("Already Failed", "不应该被调用")]), vec![]);
        let result = service.translate_many(&["Already Failed".to_string()]).await.unwrap();
        assert_eq!(result, vec!["Already Failed"]);
    }
}
