//! TMDb API client (C5, spec.md §6) — person search/details and
//! movie/TV/collection lookups, rate-limited to stay under TMDb's
//! published request budget.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::interfaces::external_services::{
    TmdbCastMember, TmdbCollectionDetails, TmdbCollectionPart, TmdbPersonDetails, TmdbPersonMatch,
    TmdbPersonService, TmdbTitleDetails, TmdbTitleService,
};
use crate::shared::error::TmdbError;

pub struct TmdbClient {
    api_key: String,
    http_client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl TmdbClient {
    pub fn new(api_key: &str) -> Result<Self, TmdbError> {
        if api_key.is_empty() {
            return Err(TmdbError::InvalidApiKey);
        }

        Ok(Self {
            api_key: api_key.to_string(),
            http_client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .map_err(|e| TmdbError::Network(e.to_string()))?,
            base_url: "https://api.themoviedb.org/3".to_string(),
            rate_limiter: RateLimiter::new(4),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T, TmdbError> {
        self.rate_limiter.acquire().await;

        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!("{}{}{}api_key={}", self.base_url, endpoint, separator, self.api_key);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(TmdbError::NotFound(endpoint.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TmdbError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(TmdbError::ApiError(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TmdbPersonService for TmdbClient {
    async fn search_person(&self, query: &str) -> Result<Vec<TmdbPersonMatch>, TmdbError> {
        let endpoint = format!("/search/person?query={}", urlencoding::encode(query));
        let response: PersonSearchResponse = self.get(&endpoint).await?;

        Ok(response
            .results
            .into_iter()
            .map(|r| TmdbPersonMatch {
                id: r.id,
                name: r.name,
                profile_path: r.profile_path,
                known_for_department: r.known_for_department,
            })
            .collect())
    }

    async fn get_person_details(&self, person_id: i64) -> Result<TmdbPersonDetails, TmdbError> {
        let endpoint = format!("/person/{person_id}?append_to_response=external_ids");
        let response: PersonDetailsResponse = self.get(&endpoint).await?;

        Ok(TmdbPersonDetails {
            id: response.id,
            name: response.name,
            also_known_as: response.also_known_as,
            imdb_id: response.external_ids.and_then(|ids| ids.imdb_id),
            profile_path: response.profile_path,
        })
    }

    async fn get_person_credits(&self, person_id: i64) -> Result<Vec<crate::interfaces::external_services::TmdbPersonCredit>, TmdbError> {
        let endpoint = format!("/person/{person_id}/combined_credits");
        let response: CombinedCreditsResponse = self.get(&endpoint).await?;

        Ok(response
            .cast
            .into_iter()
            .filter_map(|c| {
                let item_type = match c.media_type.as_str() {
                    "movie" => crate::domain::value_objects::ItemType::Movie,
                    "tv" => crate::domain::value_objects::ItemType::Series,
                    _ => return None,
                };
                let title = c.title.or(c.name)?;
                Some(crate::interfaces::external_services::TmdbPersonCredit { tmdb_id: c.id, title, item_type })
            })
            .collect())
    }
}

#[async_trait]
impl TmdbTitleService for TmdbClient {
    async fn get_movie_details(&self, tmdb_id: i64) -> Result<TmdbTitleDetails, TmdbError> {
        let endpoint = format!("/movie/{tmdb_id}?append_to_response=casts");
        let response: MovieDetailsResponse = self.get(&endpoint).await?;

        Ok(TmdbTitleDetails {
            id: response.id,
            title: response.title,
            original_title: Some(response.original_title),
            release_date: response.release_date,
            genres: response.genres.into_iter().map(|g| g.name).collect(),
            vote_average: response.vote_average.unwrap_or(0.0),
            directors: directors_from_crew(response.casts.as_ref().map(|c| c.crew.as_slice()).unwrap_or(&[])),
            studios: response.production_companies.into_iter().map(|c| c.name).collect(),
            countries: response.production_countries.into_iter().map(|c| c.name).collect(),
            cast: response.casts.map(|c| c.cast).unwrap_or_default().into_iter().map(into_cast_member).collect(),
        })
    }

    async fn get_tv_details(&self, tmdb_id: i64) -> Result<TmdbTitleDetails, TmdbError> {
        let endpoint = format!("/tv/{tmdb_id}?append_to_response=credits");
        let response: TvDetailsResponse = self.get(&endpoint).await?;

        Ok(TmdbTitleDetails {
            id: response.id,
            title: response.name,
            original_title: Some(response.original_name),
            release_date: response.first_air_date,
            genres: response.genres.into_iter().map(|g| g.name).collect(),
            vote_average: response.vote_average.unwrap_or(0.0),
            directors: directors_from_crew(response.credits.as_ref().map(|c| c.crew.as_slice()).unwrap_or(&[])),
            studios: response.production_companies.into_iter().map(|c| c.name).collect(),
            countries: response.origin_country,
            cast: response.credits.map(|c| c.cast).unwrap_or_default().into_iter().map(into_cast_member).collect(),
        })
    }

    async fn get_collection_details(&self, collection_id: i64) -> Result<TmdbCollectionDetails, TmdbError> {
        let endpoint = format!("/collection/{collection_id}");
        let response: CollectionDetailsResponse = self.get(&endpoint).await?;

        Ok(TmdbCollectionDetails {
            id: response.id,
            name: response.name,
            parts: response
                .parts
                .into_iter()
                .map(|p| TmdbCollectionPart { tmdb_id: p.id, title: p.title, release_date: p.release_date })
                .collect(),
        })
    }
}

fn directors_from_crew(crew: &[RawCrewMember]) -> Vec<String> {
    crew.iter().filter(|c| c.job == "Director").map(|c| c.name.clone()).collect()
}

fn into_cast_member(c: RawCastMember) -> TmdbCastMember {
    TmdbCastMember {
        id: c.id,
        name: c.name,
        original_name: c.original_name,
        character: c.character,
        order: c.order,
        profile_path: c.profile_path,
    }
}

/// Caps outbound request rate to TMDb's published budget.
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    permits_per_second: usize,
}

impl RateLimiter {
    pub fn new(permits_per_second: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(permits_per_second)), permits_per_second }
    }

    pub async fn acquire(&self) {
        let _permit = self.semaphore.acquire().await;
        tokio::time::sleep(Duration::from_millis(1000) / self.permits_per_second as u32).await;
    }
}

#[derive(Debug, serde::Deserialize)]
struct PersonSearchResponse {
    results: Vec<PersonSearchResult>,
}

#[derive(Debug, serde::Deserialize)]
struct PersonSearchResult {
    id: i64,
    name: String,
    profile_path: Option<String>,
    known_for_department: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct PersonDetailsResponse {
    id: i64,
    name: String,
    #[serde(default)]
    also_known_as: Vec<String>,
    profile_path: Option<String>,
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, serde::Deserialize)]
struct ExternalIds {
    imdb_id: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct MovieDetailsResponse {
    id: i64,
    title: String,
    original_title: String,
    release_date: Option<String>,
    #[serde(default)]
    genres: Vec<GenreDto>,
    vote_average: Option<f32>,
    #[serde(default)]
    production_companies: Vec<CompanyDto>,
    #[serde(default)]
    production_countries: Vec<CountryDto>,
    casts: Option<CastsWrapper>,
}

#[derive(Debug, serde::Deserialize)]
struct TvDetailsResponse {
    id: i64,
    name: String,
    original_name: String,
    first_air_date: Option<String>,
    #[serde(default)]
    genres: Vec<GenreDto>,
    vote_average: Option<f32>,
    #[serde(default)]
    production_companies: Vec<CompanyDto>,
    #[serde(default)]
    origin_country: Vec<String>,
    credits: Option<CastsWrapper>,
}

#[derive(Debug, serde::Deserialize)]
struct GenreDto {
    name: String,
}

#[derive(Debug, serde::Deserialize)]
struct CompanyDto {
    name: String,
}

#[derive(Debug, serde::Deserialize)]
struct CountryDto {
    name: String,
}

#[derive(Debug, serde::Deserialize)]
struct CastsWrapper {
    #[serde(default)]
    cast: Vec<RawCastMember>,
    #[serde(default)]
    crew: Vec<RawCrewMember>,
}

#[derive(Debug, serde::Deserialize)]
struct RawCastMember {
    id: i64,
    name: String,
    #[serde(default)]
    original_name: String,
    #[serde(default)]
    character: String,
    order: Option<i32>,
    profile_path: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct RawCrewMember {
    name: String,
    job: String,
}

#[derive(Debug, serde::Deserialize)]
struct CombinedCreditsResponse {
    #[serde(default)]
    cast: Vec<CombinedCreditDto>,
}

#[derive(Debug, serde::Deserialize)]
struct CombinedCreditDto {
    id: i64,
    media_type: String,
    title: Option<String>,
    name: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CollectionDetailsResponse {
    id: i64,
    name: String,
    #[serde(default)]
    parts: Vec<CollectionPartDto>,
}

#[derive(Debug, serde::Deserialize)]
struct CollectionPartDto {
    id: i64,
    title: String,
    release_date: Option<String>,
}
