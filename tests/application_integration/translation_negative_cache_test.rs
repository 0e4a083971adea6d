//! Integration coverage of the translation cache-then-cascade pipeline
//! against a real SQLite-backed `TranslationRepository`: idempotence on
//! already-CJK text (property 5) and negative-cache respect across repeated
//! calls (property 6).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;

use castlinkd::application::services::TranslationService;
use castlinkd::infrastructure::database::initialize_schema;
use castlinkd::infrastructure::persistence::sqlite::SqliteTranslationRepository;
use castlinkd::interfaces::external_services::{TranslationOutcome, TranslatorEngine};
use castlinkd::shared::error::TranslationError;

struct CountingEngine {
    calls: AtomicUsize,
}

#[async_trait]
impl TranslatorEngine for CountingEngine {
    fn name(&self) -> &str {
        "ai"
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutcome>, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Deliberately never resolves anything, to force every lookup into
        // the negative-cache path.
        Ok(texts.iter().map(|t| TranslationOutcome { source_text: t.clone(), translated_text: None }).collect())
    }
}

async fn sqlite_translation_repo() -> SqliteTranslationRepository {
    let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
    initialize_schema(&pool).await.unwrap();
    SqliteTranslationRepository::new(pool)
}

/// Property 5: translating already-CJK text is a no-op and calls no adapter.
#[tokio::test]
async fn translating_cjk_text_never_touches_the_engine_or_the_cache() {
    let repo = Arc::new(sqlite_translation_repo().await);
    let engine = Arc::new(CountingEngine { calls: AtomicUsize::new(0) });
    let service = TranslationService::new(repo.clone(), engine.clone(), vec![]);

    let result = service.translate_many(&["张译".to_string(), "李云龙".to_string()]).await.unwrap();
    assert_eq!(result, vec!["张译", "李云龙"]);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);

    use castlinkd::domain::repositories::TranslationRepository;
    assert!(repo.find("张译").await.unwrap().is_none(), "bypassed text is never written to the cache");
}

/// Property 6: once a text's cache entry is a negative one, no later call
/// to `translate_many` for that text reaches the adapter, until the cache
/// entry itself changes.
#[tokio::test]
async fn negative_cache_entry_survives_across_repeated_translation_calls() {
    let repo = Arc::new(sqlite_translation_repo().await);
    let engine = Arc::new(CountingEngine { calls: AtomicUsize::new(0) });
    let service = TranslationService::new(repo.clone(), engine.clone(), vec![]);

    let first = service.translate_many(&["Xyzzy Plover".to_string()]).await.unwrap();
    assert_eq!(first, vec!["Xyzzy Plover"]);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);

    for _ in 0..3 {
        let repeat = service.translate_many(&["Xyzzy Plover".to_string()]).await.unwrap();
        assert_eq!(repeat, vec!["Xyzzy Plover"]);
    }

    assert_eq!(engine.calls.load(Ordering::SeqCst), 1, "negative cache must short-circuit every subsequent call");
}
