//! Cast processor (C9): the six-step pipeline of spec.md §4.3 that turns a
//! media-server item's raw cast list into a final, translated, ordered one.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::application::services::translation_service::TranslationService;
use crate::domain::entities::{CastMember, FailedLogEntry, ProcessedLogEntry, UpsertCandidate};
use crate::domain::repositories::{IdentityRepository, LogRepository};
use crate::domain::services::{
    clean_character_name, dedup_candidates, find_seed_match, format_cast, is_animation, score_cast, select_role,
    truncate_to_limit, CountPenaltyInput, DoubanCandidate, FormatOptions, ScoredActor, SeedRecord,
};
use crate::infrastructure::filesystem::LocalCacheReader;
use crate::interfaces::external_services::{DoubanActor, DoubanService, MediaServerItem, MediaServerService};
use crate::shared::error::ApplicationError;

pub struct CastProcessorConfig {
    pub max_actors: usize,
    pub role_prefix_enabled: bool,
    pub min_score_for_review: f32,
    /// Batch-translate the media server's own (pre-merge) cast names and
    /// push the result back via `update_person_details`, so native person
    /// records read in Chinese even before Douban enrichment runs.
    pub pretranslate_native_names: bool,
}

impl Default for CastProcessorConfig {
    fn default() -> Self {
        Self {
            max_actors: 30,
            role_prefix_enabled: false,
            min_score_for_review: 6.0,
            pretranslate_native_names: false,
        }
    }
}

/// Result of a full pipeline run: the final cast plus the quality score and
/// review flag that `log_result` already computed, so callers that publish
/// or act on them don't have to re-derive them.
pub struct ProcessedCast {
    pub cast: Vec<CastMember>,
    pub quality_score: f32,
    pub needs_review: bool,
}

pub struct CastProcessor {
    identity_repo: Arc<dyn IdentityRepository>,
    log_repo: Arc<dyn LogRepository>,
    douban: Arc<dyn DoubanService>,
    media_server: Arc<dyn MediaServerService>,
    cache_reader: Arc<LocalCacheReader>,
    translation_service: Arc<TranslationService>,
    config: CastProcessorConfig,
}

impl SeedRecord for CastMember {
    fn douban_id(&self) -> Option<&str> {
        self.douban_celebrity_id.as_deref()
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }
}

impl DoubanCandidate for DoubanActor {
    fn douban_id(&self) -> Option<&str> {
        if self.id.is_empty() {
            None
        } else {
            Some(&self.id)
        }
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn original_name(&self) -> Option<&str> {
        if self.original_name.is_empty() {
            None
        } else {
            Some(&self.original_name)
        }
    }
}

impl CastProcessor {
    pub fn new(
        identity_repo: Arc<dyn IdentityRepository>,
        log_repo: Arc<dyn LogRepository>,
        douban: Arc<dyn DoubanService>,
        media_server: Arc<dyn MediaServerService>,
        cache_reader: Arc<LocalCacheReader>,
        translation_service: Arc<TranslationService>,
        config: CastProcessorConfig,
    ) -> Self {
        Self { identity_repo, log_repo, douban, media_server, cache_reader, translation_service, config }
    }

    pub async fn process_item(&self, item: &MediaServerItem) -> Result<ProcessedCast, ApplicationError> {
        if self.config.pretranslate_native_names {
            self.pretranslate_native_names(item).await?;
        }

        let mut seeds = self.seed_cast(item).await?;
        let seed_count_before_overflow = seeds.len();

        if item.item_type.is_douban_eligible() {
            let overflow = self.enrich_from_douban(item, &mut seeds).await;
            self.apply_overflow(&mut seeds, overflow).await?;
        }

        seeds = truncate_to_limit(seeds, self.config.max_actors);

        self.translate(&mut seeds).await?;

        let animation = is_animation(&item.genres);
        let final_cast = format_cast(
            seeds,
            &FormatOptions { is_animation: animation, role_prefix_enabled: self.config.role_prefix_enabled },
        );

        let score = self.score(&final_cast, animation, seed_count_before_overflow);
        let needs_review = self.log_result(item, score).await?;

        Ok(ProcessedCast { cast: final_cast, quality_score: score, needs_review })
    }

    /// A lighter pass that runs ahead of the full merge: translate just the
    /// media server's own cast names and push corrected ones back via
    /// `update_person_details`, independent of whether Douban enrichment
    /// finds anything for this item.
    async fn pretranslate_native_names(&self, item: &MediaServerItem) -> Result<(), ApplicationError> {
        let eligible: Vec<&crate::interfaces::external_services::PersonRef> = item
            .people
            .iter()
            .filter(|p| p.person_type == "Actor" && !p.id.is_empty() && !p.name.trim().is_empty())
            .collect();
        if eligible.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = eligible.iter().map(|p| p.name.clone()).collect();
        let translated = self.translation_service.translate_many(&names).await?;

        for (person, new_name) in eligible.iter().zip(translated.iter()) {
            if new_name != &person.name {
                if let Err(err) = self.media_server.update_person_details(&person.id, Some(new_name)).await {
                    warn!(person_id = %person.id, error = %err, "failed to push pre-translated native name");
                }
            }
        }
        Ok(())
    }

    /// Step 1: materialize a seed cast record per server-side person with a
    /// non-empty name and server ID, upserted into the identity map (C1).
    async fn seed_cast(&self, item: &MediaServerItem) -> Result<Vec<CastMember>, ApplicationError> {
        let mut seeds = Vec::new();
        for person in &item.people {
            if person.person_type != "Actor" || person.id.is_empty() || person.name.trim().is_empty() {
                continue;
            }

            let candidate = UpsertCandidate {
                name: Some(person.name.clone()),
                tmdb_person_id: person.provider_ids.tmdb.clone(),
                emby_person_id: Some(person.id.clone()),
                imdb_id: person.provider_ids.imdb.clone(),
                douban_celebrity_id: person.provider_ids.douban.clone(),
            };
            let identity = self.identity_repo.upsert(candidate).await?;

            seeds.push(CastMember {
                tmdb_person_id: identity.tmdb_person_id,
                douban_celebrity_id: identity.douban_celebrity_id,
                emby_person_id: Some(person.id.clone()),
                name: person.name.clone(),
                original_name: person.original_name.clone(),
                role: person.role.clone(),
                order: None,
                profile_path: None,
            });
        }
        Ok(seeds)
    }

    /// Step 2: match Douban candidates against seeds, updating matched
    /// seeds in place. Returns the unmatched overflow set.
    async fn enrich_from_douban(&self, item: &MediaServerItem, seeds: &mut [CastMember]) -> Vec<DoubanActor> {
        let candidates = match self
            .douban
            .get_acting(
                &item.name,
                item.provider_ids.imdb.as_deref(),
                item.item_type.as_str(),
                item.production_year,
                item.provider_ids.douban.as_deref(),
            )
            .await
        {
            Ok(result) => result.cast,
            Err(err) => {
                debug!(error = %err, "douban lookup failed, falling back to on-disk sidecar");
                self.read_douban_sidecar_cast(item).await
            }
        };

        let candidates = dedup_candidates(candidates);
        let mut overflow = Vec::new();

        for candidate in candidates {
            match find_seed_match(&candidate, seeds) {
                Some(idx) => {
                    let seed = &mut seeds[idx];
                    if seed.douban_celebrity_id.is_none() && !candidate.id.is_empty() {
                        seed.douban_celebrity_id = Some(candidate.id.clone());
                    }
                    let cleaned_character = clean_character_name(&candidate.character);
                    seed.role = select_role(&seed.role, &cleaned_character).to_string();

                    let upsert_candidate = UpsertCandidate {
                        name: Some(seed.name.clone()),
                        tmdb_person_id: seed.tmdb_person_id.clone(),
                        emby_person_id: seed.emby_person_id.clone(),
                        imdb_id: None,
                        douban_celebrity_id: seed.douban_celebrity_id.clone(),
                    };
                    if let Err(err) = self.identity_repo.upsert(upsert_candidate).await {
                        debug!(error = %err, "identity upsert failed during douban match");
                    }
                }
                None => overflow.push(candidate),
            }
        }
        overflow
    }

    async fn read_douban_sidecar_cast(&self, item: &MediaServerItem) -> Vec<DoubanActor> {
        let Ok(Some(value)) = self
            .cache_reader
            .read_douban(item.item_type, item.provider_ids.douban.as_deref(), item.provider_ids.imdb.as_deref())
            .await
        else {
            return Vec::new();
        };

        value
            .get("cast")
            .and_then(|c| c.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|entry| {
                        Some(DoubanActor {
                            id: entry.get("id")?.as_str().unwrap_or_default().to_string(),
                            name: entry.get("name")?.as_str().unwrap_or_default().to_string(),
                            original_name: entry
                                .get("original_name")
                                .and_then(|v| v.as_str())
                                .unwrap_or_default()
                                .to_string(),
                            character: entry
                                .get("character")
                                .and_then(|v| v.as_str())
                                .unwrap_or_default()
                                .to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Step 3: promote overflow candidates whose Douban ID already maps to
    /// a TMDb person not yet present in the cast; discard the rest.
    async fn apply_overflow(&self, seeds: &mut Vec<CastMember>, overflow: Vec<DoubanActor>) -> Result<(), ApplicationError> {
        if seeds.len() >= self.config.max_actors {
            for candidate in &overflow {
                debug!(name = %candidate.name, "discarding overflow douban candidate, seed count already at max");
            }
            return Ok(());
        }

        for candidate in overflow {
            if candidate.id.is_empty() {
                debug!(name = %candidate.name, "discarding overflow douban candidate with no douban id");
                continue;
            }

            let identity = self.identity_repo.find_by_douban_id(&candidate.id).await?;
            let Some(identity) = identity else {
                debug!(name = %candidate.name, "discarding overflow douban candidate, no identity record");
                continue;
            };
            let Some(tmdb_id) = &identity.tmdb_person_id else {
                debug!(name = %candidate.name, "discarding overflow douban candidate, identity has no tmdb id");
                continue;
            };
            if seeds.iter().any(|s| s.tmdb_person_id.as_deref() == Some(tmdb_id.as_str())) {
                continue;
            }

            seeds.push(CastMember {
                tmdb_person_id: Some(tmdb_id.clone()),
                douban_celebrity_id: Some(candidate.id.clone()),
                emby_person_id: None,
                name: candidate.name.clone(),
                original_name: if candidate.original_name.is_empty() { None } else { Some(candidate.original_name.clone()) },
                role: clean_character_name(&candidate.character),
                order: Some(-1),
                profile_path: None,
            });
        }
        Ok(())
    }

    /// Step 5: batch-translate every record's name and (pre-cleaned)
    /// character in one call.
    async fn translate(&self, seeds: &mut [CastMember]) -> Result<(), ApplicationError> {
        if seeds.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = seeds.iter().map(|m| m.name.clone()).collect();
        let characters: Vec<String> = seeds.iter().map(|m| clean_character_name(&m.role)).collect();

        let mut combined = names;
        combined.extend(characters);
        let translated = self.translation_service.translate_many(&combined).await?;

        let (translated_names, translated_characters) = translated.split_at(seeds.len());
        for (i, member) in seeds.iter_mut().enumerate() {
            member.name = translated_names[i].clone();
            member.role = translated_characters[i].clone();
        }
        Ok(())
    }

    fn score(&self, final_cast: &[CastMember], animation: bool, original_count: usize) -> f32 {
        let actors: Vec<ScoredActor> = final_cast.iter().map(|m| ScoredActor { name: &m.name, role: &m.role }).collect();
        let penalty = CountPenaltyInput { final_count: final_cast.len(), original_count, expected_final_count: None };
        score_cast(&actors, animation, penalty)
    }

    async fn log_result(&self, item: &MediaServerItem, score: f32) -> Result<bool, ApplicationError> {
        let entry = ProcessedLogEntry {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            quality_score: score,
            processed_at: Utc::now(),
        };
        let needs_review = entry.needs_review(self.config.min_score_for_review);
        if needs_review {
            debug!(item_id = %item.id, score, "cast processed below review threshold");
        }
        self.log_repo.record_processed(entry).await?;
        Ok(needs_review)
    }

    pub async fn log_failure(&self, item_id: &str, item_name: &str, reason: impl Into<String>) -> Result<(), ApplicationError> {
        let entry = FailedLogEntry { item_id: item_id.to_string(), item_name: item_name.to_string(), reason: reason.into(), failed_at: Utc::now() };
        self.log_repo.record_failed(entry).await?;
        Ok(())
    }
}
