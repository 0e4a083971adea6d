//! Identity enricher (C11): backfills `imdb_id` onto the person identity
//! map from whichever external ID a row already carries (spec.md §4.5).
//!
//! Phase A runs concurrently against TMDb (up to five workers at a time,
//! 200-row batches) since TMDb tolerates parallel requests; Phase B runs
//! sequentially against Douban, which does not.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::entities::PersonIdentity;
use crate::domain::repositories::IdentityRepository;
use crate::infrastructure::jobs::TaskHandle;
use crate::interfaces::external_services::{DoubanService, TmdbPersonService};
use crate::shared::error::{ApplicationError, DoubanError, TmdbError};

pub struct IdentityEnricherConfig {
    pub phase_a_batch_size: usize,
    pub phase_a_concurrency: usize,
    pub phase_b_commit_every: usize,
    pub max_duration: Duration,
}

impl Default for IdentityEnricherConfig {
    fn default() -> Self {
        Self {
            phase_a_batch_size: 200,
            phase_a_concurrency: 5,
            phase_b_commit_every: 50,
            max_duration: Duration::from_secs(30 * 60),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentSummary {
    pub phase_a_found: usize,
    pub phase_a_not_found: usize,
    pub phase_a_failed: usize,
    pub phase_b_found: usize,
    pub phase_b_not_found: usize,
    pub phase_b_failed: usize,
}

enum PersonLookupOutcome {
    Found(String),
    NotFound,
    Failed,
}

pub struct IdentityEnricher {
    identity_repo: Arc<dyn IdentityRepository>,
    tmdb: Arc<dyn TmdbPersonService>,
    douban: Arc<dyn DoubanService>,
    config: IdentityEnricherConfig,
}

impl IdentityEnricher {
    pub fn new(
        identity_repo: Arc<dyn IdentityRepository>,
        tmdb: Arc<dyn TmdbPersonService>,
        douban: Arc<dyn DoubanService>,
        config: IdentityEnricherConfig,
    ) -> Self {
        Self { identity_repo, tmdb, douban, config }
    }

    pub async fn run(&self, handle: Option<&TaskHandle>) -> Result<EnrichmentSummary, ApplicationError> {
        let started_at = Instant::now();
        let mut summary = EnrichmentSummary::default();

        self.run_phase_a(&mut summary, started_at, handle).await?;
        if !self.deadline_exceeded(started_at) && !Self::cancelled(handle) {
            self.run_phase_b(&mut summary, started_at, handle).await?;
        }

        Ok(summary)
    }

    fn cancelled(handle: Option<&TaskHandle>) -> bool {
        handle.is_some_and(TaskHandle::is_cancelled)
    }

    fn deadline_exceeded(&self, started_at: Instant) -> bool {
        started_at.elapsed() >= self.config.max_duration
    }

    async fn run_phase_a(
        &self,
        summary: &mut EnrichmentSummary,
        started_at: Instant,
        handle: Option<&TaskHandle>,
    ) -> Result<(), ApplicationError> {
        let mut offset = 0usize;
        loop {
            if self.deadline_exceeded(started_at) || Self::cancelled(handle) {
                break;
            }

            let batch = self
                .identity_repo
                .find_missing_imdb_with_tmdb_id(self.config.phase_a_batch_size, offset)
                .await?;
            if batch.is_empty() {
                break;
            }
            let batch_len = batch.len();

            if let Some(handle) = handle {
                handle.log(format!("phase A: looking up {batch_len} persons on tmdb")).await;
            }

            let outcomes = self.lookup_batch_concurrently(&batch).await;
            for (person, outcome) in batch.into_iter().zip(outcomes) {
                match outcome {
                    PersonLookupOutcome::Found(imdb_id) => {
                        self.identity_repo.set_imdb_id(person.map_id, &imdb_id).await?;
                        summary.phase_a_found += 1;
                    }
                    PersonLookupOutcome::NotFound => {
                        self.identity_repo.delete(person.map_id).await?;
                        summary.phase_a_not_found += 1;
                    }
                    PersonLookupOutcome::Failed => {
                        self.identity_repo.touch_last_synced(person.map_id).await?;
                        summary.phase_a_failed += 1;
                    }
                }
            }

            offset += batch_len;
            if batch_len < self.config.phase_a_batch_size {
                break;
            }
        }

        if let Some(handle) = handle {
            handle.set_progress(50, format!("phase A complete: {} resolved", summary.phase_a_found)).await;
        }
        Ok(())
    }

    async fn lookup_batch_concurrently(&self, batch: &[PersonIdentity]) -> Vec<PersonLookupOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.config.phase_a_concurrency));
        let mut tasks = Vec::with_capacity(batch.len());

        for person in batch {
            let Some(tmdb_person_id) = person.tmdb_person_id.clone() else {
                tasks.push(tokio::spawn(async { PersonLookupOutcome::Failed }));
                continue;
            };
            let tmdb = self.tmdb.clone();
            let permit = semaphore.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = permit.acquire_owned().await;
                let Ok(person_id) = tmdb_person_id.parse::<i64>() else {
                    return PersonLookupOutcome::Failed;
                };
                match tmdb.get_person_details(person_id).await {
                    Ok(details) => match details.imdb_id {
                        Some(imdb_id) => PersonLookupOutcome::Found(imdb_id),
                        None => PersonLookupOutcome::Failed,
                    },
                    Err(TmdbError::NotFound(_)) => PersonLookupOutcome::NotFound,
                    Err(err) => {
                        debug!(error = %err, "tmdb person lookup failed");
                        PersonLookupOutcome::Failed
                    }
                }
            }));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            outcomes.push(task.await.unwrap_or(PersonLookupOutcome::Failed));
        }
        outcomes
    }

    async fn run_phase_b(
        &self,
        summary: &mut EnrichmentSummary,
        started_at: Instant,
        handle: Option<&TaskHandle>,
    ) -> Result<(), ApplicationError> {
        let mut offset = 0usize;
        let mut processed_since_commit = 0usize;
        loop {
            if self.deadline_exceeded(started_at) || Self::cancelled(handle) {
                break;
            }

            let batch = self
                .identity_repo
                .find_missing_imdb_with_douban_id(self.config.phase_a_batch_size, offset)
                .await?;
            if batch.is_empty() {
                break;
            }
            let batch_len = batch.len();

            for person in batch {
                if self.deadline_exceeded(started_at) || Self::cancelled(handle) {
                    break;
                }
                let Some(douban_id) = &person.douban_celebrity_id else {
                    summary.phase_b_failed += 1;
                    continue;
                };

                match self.douban.get_celebrity_details(douban_id).await {
                    Ok(details) => match details.imdb_id {
                        Some(imdb_id) => {
                            self.identity_repo.set_imdb_id(person.map_id, &imdb_id).await?;
                            summary.phase_b_found += 1;
                        }
                        None => summary.phase_b_failed += 1,
                    },
                    Err(DoubanError::NotFound(_)) => {
                        self.identity_repo.delete(person.map_id).await?;
                        summary.phase_b_not_found += 1;
                    }
                    Err(err) => {
                        warn!(error = %err, "douban celebrity lookup failed");
                        summary.phase_b_failed += 1;
                    }
                }

                processed_since_commit += 1;
                if processed_since_commit >= self.config.phase_b_commit_every {
                    if let Some(handle) = handle {
                        handle.log(format!("phase B: committed {processed_since_commit} rows")).await;
                    }
                    processed_since_commit = 0;
                }
            }

            offset += batch_len;
            if batch_len < self.config.phase_a_batch_size {
                break;
            }
        }

        if let Some(handle) = handle {
            handle.set_progress(100, format!("phase B complete: {} resolved", summary.phase_b_found)).await;
        }
        Ok(())
    }
}
