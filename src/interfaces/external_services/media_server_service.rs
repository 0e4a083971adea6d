//! Media-Server Adapter Interface (C4, spec.md §6)

use async_trait::async_trait;

use crate::domain::value_objects::ItemType;
use crate::shared::error::{ApplicationError, FilesystemError};

#[async_trait]
pub trait MediaServerService: Send + Sync {
    async fn get_item_details(&self, item_id: &str) -> Result<MediaServerItem, ApplicationError>;

    async fn get_library_items(
        &self,
        user_id: &str,
        item_type: ItemType,
        library_ids: &[String],
    ) -> Result<Vec<LibraryItem>, ApplicationError>;

    async fn get_series_children(&self, series_id: &str) -> Result<Vec<MediaServerItem>, ApplicationError>;

    async fn update_person_details(&self, person_id: &str, name: Option<&str>) -> Result<(), ApplicationError>;

    async fn update_item_cast(&self, item_id: &str, cast: &[crate::domain::entities::CastMember]) -> Result<(), ApplicationError>;

    async fn refresh_item_metadata(&self, item_id: &str, replace_all: bool) -> Result<(), ApplicationError>;

    async fn download_image(&self, item_id: &str, kind: ImageKind, dest_path: &str) -> Result<(), FilesystemError>;

    async fn create_or_update_collection(
        &self,
        name: &str,
        tmdb_ids: &[String],
        item_type: ItemType,
    ) -> Result<(String, Vec<String>), ApplicationError>;

    async fn append_item_to_collection(&self, collection_id: &str, item_id: &str) -> Result<(), ApplicationError>;

    /// Used only by the library rebuild workflow.
    async fn clear_all_persons(&self) -> Result<(), ApplicationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Primary,
    Backdrop,
    Logo,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProviderIds {
    pub tmdb: Option<String>,
    pub imdb: Option<String>,
    pub douban: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PersonRef {
    pub id: String,
    pub name: String,
    pub original_name: Option<String>,
    pub role: String,
    pub person_type: String,
    pub provider_ids: ProviderIds,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaServerItem {
    pub id: String,
    pub name: String,
    pub item_type: ItemType,
    pub production_year: Option<i32>,
    pub genres: Vec<String>,
    pub provider_ids: ProviderIds,
    pub people: Vec<PersonRef>,
    pub image_tags: std::collections::HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LibraryItem {
    pub id: String,
    pub name: String,
    pub item_type: ItemType,
    pub provider_ids: ProviderIds,
}
