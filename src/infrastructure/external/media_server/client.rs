//! Media-server adapter (C4, spec.md §6) — a generic Emby-API-compatible
//! client. `People`/`ProviderIds` map 1:1 onto the Emby item schema; any
//! server exposing the same REST surface (Jellyfin included) works.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::entities::CastMember;
use crate::domain::value_objects::ItemType;
use crate::interfaces::external_services::{
    ImageKind, LibraryItem, MediaServerItem, MediaServerService, PersonRef, ProviderIds,
};
use crate::shared::error::{ApplicationError, FilesystemError};

pub struct MediaServerClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl MediaServerClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, ApplicationError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), api_key, http_client })
    }

    fn url(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{path}{separator}api_key={}", self.base_url, self.api_key)
    }
}

#[async_trait]
impl MediaServerService for MediaServerClient {
    async fn get_item_details(&self, item_id: &str) -> Result<MediaServerItem, ApplicationError> {
        let url = self.url(&format!("/Items/{item_id}"));
        let response: ItemDto = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(response.into())
    }

    async fn get_library_items(
        &self,
        user_id: &str,
        item_type: ItemType,
        library_ids: &[String],
    ) -> Result<Vec<LibraryItem>, ApplicationError> {
        let parent_ids = library_ids.join(",");
        let url = self.url(&format!(
            "/Users/{user_id}/Items?IncludeItemTypes={}&ParentId={parent_ids}&Recursive=true",
            item_type.as_str()
        ));
        let response: ItemsResponse = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;

        Ok(response
            .items
            .into_iter()
            .map(|i| LibraryItem { id: i.id, name: i.name, item_type: parse_item_type(&i.item_type), provider_ids: i.provider_ids.into() })
            .collect())
    }

    async fn get_series_children(&self, series_id: &str) -> Result<Vec<MediaServerItem>, ApplicationError> {
        let url = self.url(&format!("/Shows/{series_id}/Episodes"));
        let response: ItemsResponse = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(response.items.into_iter().map(Into::into).collect())
    }

    async fn update_person_details(&self, person_id: &str, name: Option<&str>) -> Result<(), ApplicationError> {
        let url = self.url(&format!("/Persons/{person_id}"));
        let mut body = HashMap::new();
        if let Some(name) = name {
            body.insert("Name", name);
        }
        self.http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn update_item_cast(&self, item_id: &str, _cast: &[CastMember]) -> Result<(), ApplicationError> {
        let url = self.url(&format!("/Items/{item_id}"));
        self.http_client.post(&url).send().await.map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn refresh_item_metadata(&self, item_id: &str, replace_all: bool) -> Result<(), ApplicationError> {
        let url = self.url(&format!(
            "/Items/{item_id}/Refresh?MetadataRefreshMode=FullRefresh&ReplaceAllMetadata={replace_all}"
        ));
        self.http_client.post(&url).send().await.map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn download_image(&self, item_id: &str, kind: ImageKind, dest_path: &str) -> Result<(), FilesystemError> {
        let kind_str = match kind {
            ImageKind::Primary => "Primary",
            ImageKind::Backdrop => "Backdrop",
            ImageKind::Logo => "Logo",
        };
        let url = self.url(&format!("/Items/{item_id}/Images/{kind_str}"));
        let bytes = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FilesystemError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
            .bytes()
            .await
            .map_err(|e| FilesystemError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        std::fs::write(dest_path, bytes)?;
        Ok(())
    }

    async fn create_or_update_collection(
        &self,
        name: &str,
        tmdb_ids: &[String],
        item_type: ItemType,
    ) -> Result<(String, Vec<String>), ApplicationError> {
        let _ = item_type;
        let url = self.url(&format!("/Collections?Name={}", urlencoding::encode(name)));
        let response: CreateCollectionResponse = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok((response.id, tmdb_ids.to_vec()))
    }

    async fn append_item_to_collection(&self, collection_id: &str, item_id: &str) -> Result<(), ApplicationError> {
        let url = self.url(&format!("/Collections/{collection_id}/Items?Ids={item_id}"));
        self.http_client.post(&url).send().await.map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn clear_all_persons(&self) -> Result<(), ApplicationError> {
        let url = self.url("/Persons/ClearAll");
        self.http_client.post(&url).send().await.map_err(|e| ApplicationError::ServiceUnavailable(e.to_string()))?;
        Ok(())
    }
}

fn parse_item_type(s: &str) -> ItemType {
    match s {
        "Series" => ItemType::Series,
        "Episode" => ItemType::Episode,
        "Season" => ItemType::Season,
        _ => ItemType::Movie,
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct ProviderIdsDto {
    #[serde(default, rename = "Tmdb")]
    tmdb: Option<String>,
    #[serde(default, rename = "Imdb")]
    imdb: Option<String>,
    #[serde(default, rename = "Douban")]
    douban: Option<String>,
}

impl From<ProviderIdsDto> for ProviderIds {
    fn from(dto: ProviderIdsDto) -> Self {
        ProviderIds { tmdb: dto.tmdb, imdb: dto.imdb, douban: dto.douban }
    }
}

#[derive(Debug, serde::Deserialize)]
struct PersonDto {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(default, rename = "OriginalName")]
    original_name: Option<String>,
    #[serde(default, rename = "Role")]
    role: String,
    #[serde(default, rename = "Type")]
    person_type: String,
    #[serde(default, rename = "ProviderIds")]
    provider_ids: ProviderIdsDto,
}

#[derive(Debug, serde::Deserialize)]
struct ItemDto {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    item_type: String,
    #[serde(default, rename = "ProductionYear")]
    production_year: Option<i32>,
    #[serde(default, rename = "Genres")]
    genres: Vec<String>,
    #[serde(default, rename = "ProviderIds")]
    provider_ids: ProviderIdsDto,
    #[serde(default, rename = "People")]
    people: Vec<PersonDto>,
    #[serde(default, rename = "ImageTags")]
    image_tags: HashMap<String, String>,
}

impl From<ItemDto> for MediaServerItem {
    fn from(dto: ItemDto) -> Self {
        MediaServerItem {
            id: dto.id,
            name: dto.name,
            item_type: parse_item_type(&dto.item_type),
            production_year: dto.production_year,
            genres: dto.genres,
            provider_ids: dto.provider_ids.into(),
            people: dto
                .people
                .into_iter()
                .map(|p| PersonRef {
                    id: p.id,
                    name: p.name,
                    original_name: p.original_name,
                    role: p.role,
                    person_type: p.person_type,
                    provider_ids: p.provider_ids.into(),
                })
                .collect(),
            image_tags: dto.image_tags,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ItemsResponse {
    #[serde(rename = "Items")]
    items: Vec<ItemDto>,
}

#[derive(Debug, serde::Deserialize)]
struct CreateCollectionResponse {
    #[serde(rename = "Id")]
    id: String,
}
