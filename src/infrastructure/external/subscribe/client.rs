//! Reqwest-based client for an external download-automation service (C14,
//! spec.md §4.8's "external subscribe adapter"). The core never downloads
//! media; it only asks this queue to acquire a title it already knows is
//! missing and released.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::domain::value_objects::ItemType;
use crate::interfaces::external_services::SubscribeService;
use crate::shared::error::SubscribeError;

pub struct MoviePilotClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl MoviePilotClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, SubscribeError> {
        Ok(Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .map_err(|e| SubscribeError::Network(e.to_string()))?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl SubscribeService for MoviePilotClient {
    async fn subscribe(&self, tmdb_id: &str, item_type: ItemType, title: &str) -> Result<(), SubscribeError> {
        let endpoint = match item_type {
            ItemType::Series | ItemType::Season | ItemType::Episode => "subscribe/tv",
            ItemType::Movie => "subscribe/movie",
        };
        let url = format!("{}/api/v1/{}", self.base_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&SubscribeRequest { tmdbid: tmdb_id, title })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SubscribeError::Rejected("adapter rejected credentials".to_string()));
        }
        if !status.is_success() {
            return Err(SubscribeError::Rejected(format!("adapter returned HTTP {}", status.as_u16())));
        }

        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
struct SubscribeRequest<'a> {
    tmdbid: &'a str,
    title: &'a str,
}
