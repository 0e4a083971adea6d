//! Fallback translation engines (C8) — thin wrappers over the public
//! endpoints of Google/Bing/Baidu's translate UIs. Each only ever handles
//! one text per request; `translate_batch` just sequences calls, since these
//! free endpoints have no batch mode and the call volume here is already
//! bounded by the pre-filter and cache layers upstream.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::interfaces::external_services::{TranslationOutcome, TranslatorEngine};
use crate::shared::error::TranslationError;

fn default_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build translation engine http client")
}

async fn translate_sequentially<F, Fut>(texts: &[String], translate_one: F) -> Result<Vec<TranslationOutcome>, TranslationError>
where
    F: Fn(String) -> Fut,
    Fut: std::future::Future<Output = Result<Option<String>, TranslationError>>,
{
    let mut outcomes = Vec::with_capacity(texts.len());
    for text in texts {
        let translated = translate_one(text.clone()).await?;
        let accepted = translated.filter(|t| !t.trim().is_empty() && !t.eq_ignore_ascii_case(text));
        outcomes.push(TranslationOutcome { source_text: text.clone(), translated_text: accepted });
    }
    Ok(outcomes)
}

pub struct GoogleTranslateEngine {
    http_client: Client,
}

impl GoogleTranslateEngine {
    pub fn new() -> Self {
        Self { http_client: default_client() }
    }

    async fn translate_one(&self, text: String) -> Result<Option<String>, TranslationError> {
        let url = format!(
            "https://translate.googleapis.com/translate_a/single?client=gtx&sl=en&tl=zh-CN&dt=t&q={}",
            urlencoding::encode(&text)
        );
        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(TranslationError::HttpError(format!("google returned {}", response.status())));
        }
        let body: serde_json::Value = response.json().await.map_err(|e| TranslationError::ParseError(e.to_string()))?;
        Ok(extract_google_sentences(&body))
    }
}

impl Default for GoogleTranslateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslatorEngine for GoogleTranslateEngine {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutcome>, TranslationError> {
        translate_sequentially(texts, |text| self.translate_one(text)).await
    }
}

fn extract_google_sentences(body: &serde_json::Value) -> Option<String> {
    let sentences = body.get(0)?.as_array()?;
    let mut combined = String::new();
    for sentence in sentences {
        combined.push_str(sentence.get(0)?.as_str()?);
    }
    Some(combined).filter(|s| !s.is_empty())
}

pub struct BingTranslateEngine {
    http_client: Client,
}

impl BingTranslateEngine {
    pub fn new() -> Self {
        Self { http_client: default_client() }
    }

    async fn translate_one(&self, text: String) -> Result<Option<String>, TranslationError> {
        let url = "https://api.cognitive.microsofttranslator.com/translate?api-version=3.0&from=en&to=zh-Hans";
        let response = self
            .http_client
            .post(url)
            .json(&serde_json::json!([{ "Text": text }]))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TranslationError::HttpError(format!("bing returned {}", response.status())));
        }
        let body: Vec<BingResult> = response.json().await.map_err(|e| TranslationError::ParseError(e.to_string()))?;
        Ok(body.into_iter().next().and_then(|r| r.translations.into_iter().next()).map(|t| t.text))
    }
}

impl Default for BingTranslateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslatorEngine for BingTranslateEngine {
    fn name(&self) -> &str {
        "bing"
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutcome>, TranslationError> {
        translate_sequentially(texts, |text| self.translate_one(text)).await
    }
}

#[derive(Debug, serde::Deserialize)]
struct BingResult {
    translations: Vec<BingTranslation>,
}

#[derive(Debug, serde::Deserialize)]
struct BingTranslation {
    text: String,
}

pub struct BaiduTranslateEngine {
    app_id: String,
    app_secret: String,
    http_client: Client,
}

impl BaiduTranslateEngine {
    pub fn new(app_id: String, app_secret: String) -> Self {
        Self { app_id, app_secret, http_client: default_client() }
    }

    fn sign(&self, text: &str, salt: &str) -> String {
        let raw = format!("{}{text}{salt}{}", self.app_id, self.app_secret);
        format!("{:x}", md5::compute(raw.as_bytes()))
    }

    async fn translate_one(&self, text: String) -> Result<Option<String>, TranslationError> {
        let salt = format!("{}", text.len());
        let sign = self.sign(&text, &salt);
        let url = format!(
            "https://fanyi-api.baidu.com/api/trans/vip/translate?q={}&from=en&to=zh&appid={}&salt={salt}&sign={sign}",
            urlencoding::encode(&text),
            self.app_id
        );
        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(TranslationError::HttpError(format!("baidu returned {}", response.status())));
        }
        let body: BaiduResponse = response.json().await.map_err(|e| TranslationError::ParseError(e.to_string()))?;
        Ok(body.trans_result.into_iter().next().map(|r| r.dst))
    }
}

#[async_trait]
impl TranslatorEngine for BaiduTranslateEngine {
    fn name(&self) -> &str {
        "baidu"
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutcome>, TranslationError> {
        translate_sequentially(texts, |text| self.translate_one(text)).await
    }
}

#[derive(Debug, serde::Deserialize)]
struct BaiduResponse {
    #[serde(default)]
    trans_result: Vec<BaiduTransResult>,
}

#[derive(Debug, serde::Deserialize)]
struct BaiduTransResult {
    dst: String,
}
