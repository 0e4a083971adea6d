//! TMDb Adapter Interfaces (C5)
//!
//! Following Interface Segregation Principle (ISP), the service is split into
//! focused traits so a consumer that only needs person lookups (the identity
//! enricher) doesn't depend on the title-lookup surface (the webhook router
//! and collection engine).

use async_trait::async_trait;

use crate::domain::value_objects::ItemType;
use crate::shared::error::TmdbError;

/// Person search and detail lookups, used by the identity enricher (C11).
#[async_trait]
pub trait TmdbPersonService: Send + Sync {
    async fn search_person(&self, query: &str) -> Result<Vec<TmdbPersonMatch>, TmdbError>;

    /// Fetches person details with `external_ids` and `also_known_as`
    /// appended (spec.md §6: "GetPersonDetails(id, include: external_ids,
    /// also_known_as)"). Must surface `TmdbError::NotFound` for HTTP 404 so
    /// callers can distinguish "deleted upstream" from a transient failure.
    async fn get_person_details(&self, person_id: i64) -> Result<TmdbPersonDetails, TmdbError>;

    /// Movie and TV credits, used by the actor tracking task to find titles
    /// a subscribed person appears in that aren't yet known.
    async fn get_person_credits(&self, person_id: i64) -> Result<Vec<TmdbPersonCredit>, TmdbError>;
}

/// Title lookups, used by the webhook router (C13) and collection engine (C14).
#[async_trait]
pub trait TmdbTitleService: Send + Sync {
    async fn get_movie_details(&self, tmdb_id: i64) -> Result<TmdbTitleDetails, TmdbError>;

    async fn get_tv_details(&self, tmdb_id: i64) -> Result<TmdbTitleDetails, TmdbError>;

    async fn get_collection_details(&self, collection_id: i64) -> Result<TmdbCollectionDetails, TmdbError>;
}

/// Combined TMDb service interface for implementations that provide both.
#[async_trait]
pub trait TmdbService: TmdbPersonService + TmdbTitleService {}

#[async_trait]
impl<T> TmdbService for T where T: TmdbPersonService + TmdbTitleService {}

/// A single hit from `SearchPerson`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TmdbPersonMatch {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
    pub known_for_department: Option<String>,
}

/// `GetPersonDetails` result, with `external_ids` and `also_known_as`
/// already merged in by the adapter.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TmdbPersonDetails {
    pub id: i64,
    pub name: String,
    pub also_known_as: Vec<String>,
    pub imdb_id: Option<String>,
    pub profile_path: Option<String>,
}

/// Movie/TV detail, trimmed to the fields the collection engine and webhook
/// router actually consult (genres, release info, cast, and the
/// director/studio/country facets the filter-sourced collection engine
/// matches against).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TmdbTitleDetails {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub vote_average: f32,
    pub cast: Vec<TmdbCastMember>,
    pub directors: Vec<String>,
    pub studios: Vec<String>,
    pub countries: Vec<String>,
}

/// One entry from a person's combined movie/TV credits.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TmdbPersonCredit {
    pub tmdb_id: i64,
    pub title: String,
    pub item_type: ItemType,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TmdbCastMember {
    pub id: i64,
    pub name: String,
    pub original_name: String,
    pub character: String,
    pub order: Option<i32>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TmdbCollectionDetails {
    pub id: i64,
    pub name: String,
    pub parts: Vec<TmdbCollectionPart>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TmdbCollectionPart {
    pub tmdb_id: i64,
    pub title: String,
    pub release_date: Option<String>,
}
