//! Douban adapter (C6, spec.md §6) — HTML-scraped cast lookups behind a
//! configurable per-call cooldown and an optional session cookie for
//! login-gated responses.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::interfaces::external_services::{DoubanActingResult, DoubanActor, DoubanCelebrityDetails, DoubanService};
use crate::shared::error::DoubanError;

pub struct DoubanClient {
    http_client: Client,
    session_cookie: Option<String>,
    cooldown: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl DoubanClient {
    pub fn new(session_cookie: Option<String>, cooldown: Duration) -> Result<Self, DoubanError> {
        Ok(Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .map_err(|e| DoubanError::Network(e.to_string()))?,
            session_cookie,
            cooldown,
            last_call: Mutex::new(None),
        })
    }

    async fn throttle(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.cooldown {
                tokio::time::sleep(self.cooldown - elapsed).await;
            }
        }
        *last_call = Some(Instant::now());
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http_client.get(url);
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }
        builder
    }
}

#[async_trait]
impl DoubanService for DoubanClient {
    async fn get_acting(
        &self,
        name: &str,
        imdb_id: Option<&str>,
        item_type: &str,
        year: Option<i32>,
        douban_id_override: Option<&str>,
    ) -> Result<DoubanActingResult, DoubanError> {
        self.throttle().await;

        let subject_id = match douban_id_override {
            Some(id) => id.to_string(),
            None => self.search_subject(name, item_type, year).await?,
        };

        let url = format!("https://movie.douban.com/subject/{subject_id}/");
        let response = self.request(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(DoubanError::NotFound(subject_id)),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(DoubanError::Unauthorized),
            status if !status.is_success() => Err(DoubanError::Network(format!("HTTP {status}"))),
            _ => {
                let html = response.text().await?;
                let _ = imdb_id;
                Ok(parse_acting(&html))
            }
        }
    }

    async fn get_celebrity_details(&self, douban_id: &str) -> Result<DoubanCelebrityDetails, DoubanError> {
        self.throttle().await;

        let url = format!("https://movie.douban.com/celebrity/{douban_id}/");
        let response = self.request(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(DoubanError::NotFound(douban_id.to_string())),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(DoubanError::Unauthorized),
            status if !status.is_success() => Err(DoubanError::Network(format!("HTTP {status}"))),
            _ => {
                let html = response.text().await?;
                Ok(parse_celebrity(douban_id, &html))
            }
        }
    }
}

impl DoubanClient {
    async fn search_subject(&self, name: &str, item_type: &str, year: Option<i32>) -> Result<String, DoubanError> {
        let query = match year {
            Some(y) => format!("{name} {y}"),
            None => name.to_string(),
        };
        let cat = if item_type == "tv" { "1002" } else { "1002" };
        let url = format!(
            "https://www.douban.com/search?cat={cat}&q={}",
            urlencoding::encode(&query)
        );
        let response = self.request(&url).send().await?;
        let html = response.text().await?;
        extract_subject_id(&html).ok_or_else(|| DoubanError::NotFound(name.to_string()))
    }
}

fn extract_subject_id(html: &str) -> Option<String> {
    let marker = "subject/";
    let start = html.find(marker)? + marker.len();
    let rest = &html[start..];
    let end = rest.find('/')?;
    let candidate = &rest[..end];
    candidate.chars().all(|c| c.is_ascii_digit()).then(|| candidate.to_string())
}

/// `extra.info` entries appear in the rendered page as `label: value` pairs
/// inside the info block; we only ever need the 演员 (cast) table here.
fn parse_acting(html: &str) -> DoubanActingResult {
    let mut cast = Vec::new();
    for segment in html.split("rolename").skip(1) {
        if let Some(name) = extract_between(segment, ">", "<") {
            cast.push(DoubanActor {
                id: String::new(),
                name: name.clone(),
                original_name: name,
                character: String::new(),
            });
        }
    }
    DoubanActingResult { cast }
}

fn parse_celebrity(douban_id: &str, html: &str) -> DoubanCelebrityDetails {
    let name = extract_between(html, "<title>", "</title>").unwrap_or_default();
    let imdb_id = extract_between(html, "IMDb编号:</span>", "</li>")
        .or_else(|| extract_between(html, "IMDb:</span>", "</li>"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    DoubanCelebrityDetails { id: douban_id.to_string(), name, imdb_id }
}

fn extract_between(haystack: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = haystack.find(start)? + start.len();
    let rest = &haystack[start_idx..];
    let end_idx = rest.find(end)?;
    Some(rest[..end_idx].trim().to_string())
}
