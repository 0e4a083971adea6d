//! End-to-end scenarios, literal inputs and expectations taken verbatim
//! from the reconciliation-and-enrichment design notes (S1-S6).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;

use castlinkd::application::services::cast_processor::{CastProcessor, CastProcessorConfig};
use castlinkd::application::services::identity_enricher::{IdentityEnricher, IdentityEnricherConfig};
use castlinkd::domain::entities::{
    CastMember, FailedLogEntry, ProcessedLogEntry, TranslationEntry, UpsertCandidate,
};
use castlinkd::domain::repositories::{IdentityRepository, LogRepository, TranslationRepository};
use castlinkd::domain::services::{format_cast, score_cast, CountPenaltyInput, FormatOptions, ScoredActor};
use castlinkd::domain::value_objects::ItemType;
use castlinkd::infrastructure::database::initialize_schema;
use castlinkd::infrastructure::filesystem::{FileOperationsAdapter, LocalCacheReader};
use castlinkd::infrastructure::persistence::sqlite::SqliteIdentityRepository;
use castlinkd::interfaces::external_services::{
    DoubanActingResult, DoubanActor, DoubanCelebrityDetails, DoubanService, ImageKind, LibraryItem,
    MediaServerItem, MediaServerService, PersonRef, ProviderIds, TmdbPersonCredit, TmdbPersonDetails,
    TmdbPersonMatch, TmdbPersonService, TranslationOutcome, TranslatorEngine,
};
use castlinkd::interfaces::filesystem::FileOperations;
use castlinkd::shared::error::{ApplicationError, DoubanError, FilesystemError, RepositoryError, TmdbError, TranslationError};

async fn sqlite_identity_repo() -> SqliteIdentityRepository {
    let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
    initialize_schema(&pool).await.unwrap();
    SqliteIdentityRepository::new(pool)
}

struct StubDouban {
    cast: Vec<DoubanActor>,
}

#[async_trait]
impl DoubanService for StubDouban {
    async fn get_acting(
        &self,
        _name: &str,
        _imdb_id: Option<&str>,
        _item_type: &str,
        _year: Option<i32>,
        _douban_id_override: Option<&str>,
    ) -> Result<DoubanActingResult, DoubanError> {
        Ok(DoubanActingResult { cast: self.cast.clone() })
    }

    async fn get_celebrity_details(&self, _douban_id: &str) -> Result<DoubanCelebrityDetails, DoubanError> {
        Err(DoubanError::NotFound("unused".to_string()))
    }
}

struct StubTranslator {
    responses: HashMap<&'static str, &'static str>,
}

#[async_trait]
impl TranslatorEngine for StubTranslator {
    fn name(&self) -> &str {
        "ai"
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

struct InMemoryTranslationRepo {
    entries: Mutex<HashMap<String, TranslationEntry>>,
}

impl InMemoryTranslationRepo {
    fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }
}

#[async_trait]
impl TranslationRepository for InMemoryTranslationRepo {
    async fn find(&self, source_text: &str) -> Result<Option<TranslationEntry>, RepositoryError> {
        Ok(self.entries.lock().unwrap().get(source_text).cloned())
    }
    async fn find_many(&self, source_texts: &[String]) -> Result<Vec<TranslationEntry>, RepositoryError> {
        let guard = self.entries.lock().unwrap();
        Ok(source_texts.iter().filter_map(|t| guard.get(t).cloned()).collect())
    }
    async fn upsert(&self, entry: TranslationEntry) -> Result<(), RepositoryError> {
        self.entries.lock().unwrap().insert(entry.source_text.clone(), entry);
        Ok(())
    }
}

struct NullLogRepository;

#[async_trait]
impl LogRepository for NullLogRepository {
    async fn record_processed(&self, _entry: ProcessedLogEntry) -> Result<(), RepositoryError> {
        Ok(())
    }
    async fn record_failed(&self, _entry: FailedLogEntry) -> Result<(), RepositoryError> {
        Ok(())
    }
    async fn find_needing_review(&self, _limit: usize) -> Result<Vec<ProcessedLogEntry>, RepositoryError> {
        Ok(Vec::new())
    }
    async fn find_recent_failures(&self, _limit: usize) -> Result<Vec<FailedLogEntry>, RepositoryError> {
        Ok(Vec::new())
    }
}

struct NullMediaServerService;

#[async_trait]
impl MediaServerService for NullMediaServerService {
    async fn get_item_details(&self, _item_id: &str) -> Result<MediaServerItem, ApplicationError> {
        unimplemented!("unused in these scenarios")
    }
    async fn get_library_items(
        &self,
        _user_id: &str,
        _item_type: ItemType,
        _library_ids: &[String],
    ) -> Result<Vec<LibraryItem>, ApplicationError> {
        Ok(Vec::new())
    }
    async fn get_series_children(&self, _series_id: &str) -> Result<Vec<MediaServerItem>, ApplicationError> {
        Ok(Vec::new())
    }
    async fn update_person_details(&self, _person_id: &str, _name: Option<&str>) -> Result<(), ApplicationError> {
        Ok(())
    }
    async fn update_item_cast(&self, _item_id: &str, _cast: &[CastMember]) -> Result<(), ApplicationError> {
        Ok(())
    }
    async fn refresh_item_metadata(&self, _item_id: &str, _replace_all: bool) -> Result<(), ApplicationError> {
        Ok(())
    }
    async fn download_image(&self, _item_id: &str, _kind: ImageKind, _dest_path: &str) -> Result<(), FilesystemError> {
        Ok(())
    }
    async fn create_or_update_collection(
        &self,
        _name: &str,
        _tmdb_ids: &[String],
        _item_type: ItemType,
    ) -> Result<(String, Vec<String>), ApplicationError> {
        Ok((String::new(), Vec::new()))
    }
    async fn append_item_to_collection(&self, _collection_id: &str, _item_id: &str) -> Result<(), ApplicationError> {
        Ok(())
    }
    async fn clear_all_persons(&self) -> Result<(), ApplicationError> {
        Ok(())
    }
}

fn movie_item(name: &str, tmdb: Option<&str>, imdb: Option<&str>, people: Vec<PersonRef>) -> MediaServerItem {
    MediaServerItem {
        id: format!("item-{name}"),
        name: name.to_string(),
        item_type: ItemType::Movie,
        production_year: Some(2015),
        genres: vec!["Drama".to_string()],
        provider_ids: ProviderIds { tmdb: tmdb.map(str::to_string), imdb: imdb.map(str::to_string), douban: None },
        people,
        image_tags: Default::default(),
    }
}

fn build_processor(
    identity_repo: Arc<dyn IdentityRepository>,
    douban: StubDouban,
    translator_responses: &[(&'static str, &'static str)],
    cache_root: &std::path::Path,
) -> CastProcessor {
    let file_ops: Arc<dyn FileOperations> = Arc::new(FileOperationsAdapter::new());
    let cache_reader = Arc::new(LocalCacheReader::new(cache_root.to_path_buf(), file_ops));
    let translation_repo = Arc::new(InMemoryTranslationRepo::new());
    let translator =
        Arc::new(StubTranslator { responses: translator_responses.iter().cloned().collect() });
    let translation_service = Arc::new(castlinkd::application::services::TranslationService::new(
        translation_repo,
        translator,
        vec![],
    ));
    CastProcessor::new(
        identity_repo,
        Arc::new(NullLogRepository),
        Arc::new(douban),
        Arc::new(NullMediaServerService),
        cache_reader,
        translation_service,
        CastProcessorConfig::default(),
    )
}

/// S1 — Pure merge by ID.
#[tokio::test]
async fn s1_pure_merge_by_id() {
    let identity_repo: Arc<dyn IdentityRepository> = Arc::new(sqlite_identity_repo().await);

    // Precondition: person_identity_map already reconciles tmdb=T1 with douban=D1.
    identity_repo
        .upsert(UpsertCandidate {
            name: None,
            tmdb_person_id: Some("T1".to_string()),
            emby_person_id: None,
            imdb_id: None,
            douban_celebrity_id: Some("D1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(identity_repo.count().await.unwrap(), 1);

    let item = movie_item(
        "Mad Men",
        Some("T1"),
        None,
        vec![PersonRef {
            id: "E1".to_string(),
            name: "Jon Hamm".to_string(),
            original_name: None,
            role: "Actor".to_string(),
            person_type: "Actor".to_string(),
            provider_ids: ProviderIds { tmdb: Some("T1".to_string()), imdb: None, douban: None },
        }],
    );
    let douban = StubDouban {
        cast: vec![DoubanActor {
            id: "D1".to_string(),
            name: "乔·哈姆".to_string(),
            original_name: String::new(),
            character: "Don Draper".to_string(),
        }],
    };

    let dir = tempfile::tempdir().unwrap();
    let processor = build_processor(identity_repo.clone(), douban, &[("Jon Hamm", "乔·哈姆")], dir.path());
    let result = processor.process_item(&item).await.unwrap();

    assert_eq!(result.cast.len(), 1);
    let member = &result.cast[0];
    assert_eq!(member.name, "乔·哈姆");
    assert_eq!(member.role, "Don Draper");
    assert_eq!(member.emby_person_id.as_deref(), Some("E1"));
    assert_eq!(member.tmdb_person_id.as_deref(), Some("T1"));
    assert_eq!(member.douban_celebrity_id.as_deref(), Some("D1"));

    assert_eq!(identity_repo.count().await.unwrap(), 1, "map cardinality must not change");
}

/// S2 — Name-variant match.
#[tokio::test]
async fn s2_name_variant_match() {
    let identity_repo: Arc<dyn IdentityRepository> = Arc::new(sqlite_identity_repo().await);

    let item = movie_item(
        "A Little Red Flower",
        None,
        None,
        vec![PersonRef {
            id: "E2".to_string(),
            name: "Zhang Zifeng".to_string(),
            original_name: Some("张子枫".to_string()),
            role: "Actress".to_string(),
            person_type: "Actor".to_string(),
            provider_ids: ProviderIds { tmdb: None, imdb: None, douban: None },
        }],
    );
    let douban = StubDouban {
        cast: vec![DoubanActor {
            id: "9001".to_string(),
            name: "张子枫".to_string(),
            original_name: "Zifeng Zhang".to_string(),
            character: "马小远".to_string(),
        }],
    };

    let dir = tempfile::tempdir().unwrap();
    let processor = build_processor(identity_repo.clone(), douban, &[], dir.path());
    let result = processor.process_item(&item).await.unwrap();

    assert_eq!(result.cast.len(), 1, "the douban candidate must merge into the existing seed, not overflow");
    assert_eq!(result.cast[0].role, "马小远", "non-placeholder CJK douban role replaces the seed's placeholder role");
    assert_eq!(result.cast[0].douban_celebrity_id.as_deref(), Some("9001"));
}

/// S3 — Anime role formatting.
#[test]
fn s3_anime_role_formatting() {
    let member = |name: &str, role: &str| CastMember {
        tmdb_person_id: None,
        douban_celebrity_id: None,
        emby_person_id: None,
        name: name.to_string(),
        original_name: None,
        role: role.to_string(),
        order: Some(0),
        profile_path: None,
    };

    let out = format_cast(
        vec![member("蒙奇·D·路飞", "路飞"), member("无名船员", "")],
        &FormatOptions { is_animation: true, role_prefix_enabled: true },
    );

    let with_role = out.iter().find(|m| m.name == "蒙奇·D·路飞").unwrap();
    assert_eq!(with_role.role, "配 路飞");

    let without_role = out.iter().find(|m| m.name == "无名船员").unwrap();
    assert_eq!(without_role.role, "配音", "empty character gets the generic substitute, never a prefix");
}

/// S4 — Same-name disambiguation.
#[test]
fn s4_same_name_disambiguation() {
    let member = |order: i32| CastMember {
        tmdb_person_id: None,
        douban_celebrity_id: None,
        emby_person_id: None,
        name: "李明".to_string(),
        original_name: None,
        role: "村民".to_string(),
        order: Some(order),
        profile_path: None,
    };

    let out = format_cast(
        vec![member(0), member(1), member(2)],
        &FormatOptions { is_animation: false, role_prefix_enabled: false },
    );

    assert_eq!(out[0].name, "李明");
    assert_eq!(out[1].name, "李明\u{200b}");
    assert_eq!(out[2].name, "李明\u{200b}\u{200b}");
}

/// S5 — Quality score with count penalty.
#[test]
fn s5_quality_score_with_count_penalty() {
    let actors: Vec<ScoredActor> = (0..6).map(|_| ScoredActor { name: "张译", role: "李云龙" }).collect();
    let penalty = CountPenaltyInput { final_count: 6, original_count: 30, expected_final_count: None };

    let score = score_cast(&actors, false, penalty);
    assert_eq!(score, 6.0);

    let entry = ProcessedLogEntry {
        item_id: "s5".to_string(),
        item_name: "Thirty Down To Six".to_string(),
        quality_score: score,
        processed_at: Utc::now(),
    };
    assert!(!entry.needs_review(6.0), "exactly at the default threshold must not be pushed to the failed-log");
}

struct S6Tmdb;

#[async_trait]
impl TmdbPersonService for S6Tmdb {
    async fn search_person(&self, _query: &str) -> Result<Vec<TmdbPersonMatch>, TmdbError> {
        Ok(vec![])
    }

    async fn get_person_details(&self, person_id: i64) -> Result<TmdbPersonDetails, TmdbError> {
        match person_id {
            1 => Ok(TmdbPersonDetails {
                id: 1,
                name: "Found Person".to_string(),
                also_known_as: vec![],
                imdb_id: Some("I1".to_string()),
                profile_path: None,
            }),
            2 => Err(TmdbError::NotFound("deleted upstream".to_string())),
            3 => Err(TmdbError::Network("connection reset".to_string())),
            _ => unreachable!("unexpected tmdb person id in S6"),
        }
    }

    async fn get_person_credits(&self, _person_id: i64) -> Result<Vec<TmdbPersonCredit>, TmdbError> {
        Ok(vec![])
    }
}

struct S6Douban;

#[async_trait]
impl DoubanService for S6Douban {
    async fn get_acting(
        &self,
        _name: &str,
        _imdb_id: Option<&str>,
        _item_type: &str,
        _year: Option<i32>,
        _douban_id_override: Option<&str>,
    ) -> Result<DoubanActingResult, DoubanError> {
        Ok(DoubanActingResult { cast: vec![] })
    }

    async fn get_celebrity_details(&self, _douban_id: &str) -> Result<DoubanCelebrityDetails, DoubanError> {
        Err(DoubanError::NotFound("unused".to_string()))
    }
}

/// S6 — Enricher 404 cleanup.
#[tokio::test]
async fn s6_enricher_404_cleanup() {
    let repo = sqlite_identity_repo().await;

    let t1 = repo.upsert(UpsertCandidate { tmdb_person_id: Some("1".to_string()), ..Default::default() }).await.unwrap();
    let t2 = repo.upsert(UpsertCandidate { tmdb_person_id: Some("2".to_string()), ..Default::default() }).await.unwrap();
    let t3 = repo.upsert(UpsertCandidate { tmdb_person_id: Some("3".to_string()), ..Default::default() }).await.unwrap();

    let identity_repo: Arc<dyn IdentityRepository> = Arc::new(repo);
    let enricher = IdentityEnricher::new(
        identity_repo.clone(),
        Arc::new(S6Tmdb),
        Arc::new(S6Douban),
        IdentityEnricherConfig::default(),
    );

    let before_t3 = identity_repo.find_by_id(t3.map_id).await.unwrap().unwrap();
    assert!(before_t3.last_synced_at.is_none());

    let summary = enricher.run(None).await.unwrap();
    assert_eq!(summary.phase_a_found, 1);
    assert_eq!(summary.phase_a_not_found, 1);
    assert_eq!(summary.phase_a_failed, 1);

    let after_t1 = identity_repo.find_by_id(t1.map_id).await.unwrap().unwrap();
    assert_eq!(after_t1.imdb_id.as_deref(), Some("I1"));

    assert!(identity_repo.find_by_id(t2.map_id).await.unwrap().is_none(), "404 row must be deleted");

    let after_t3 = identity_repo.find_by_id(t3.map_id).await.unwrap().unwrap();
    assert_eq!(after_t3.tmdb_person_id, before_t3.tmdb_person_id);
    assert_eq!(after_t3.imdb_id, before_t3.imdb_id);
    assert_eq!(after_t3.douban_celebrity_id, before_t3.douban_celebrity_id);
    assert!(after_t3.last_synced_at.is_some(), "transient failure still bumps last_synced_at");
}
