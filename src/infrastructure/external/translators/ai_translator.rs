//! AI batch translator (C8) — talks to a local Ollama instance, asking for
//! one numbered response per input text so a whole item's names/characters
//! go through a single round trip.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::interfaces::external_services::{TranslationOutcome, TranslatorEngine};
use crate::shared::error::TranslationError;

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: i32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

pub struct AiBatchTranslator {
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl AiBatchTranslator {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("failed to build ai translator http client"),
        }
    }

    fn build_prompt(&self, texts: &[String]) -> String {
        let numbered = texts
            .iter()
            .enumerate()
            .map(|(i, t)| format!("[{}] {}", i + 1, t))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Translate the following actor and character names from English to \
             Simplified Chinese. Keep the [N] numbering exactly as given. Output \
             ONLY the numbered translations, one per line, nothing else.\n\n{numbered}"
        )
    }
}

#[async_trait]
impl TranslatorEngine for AiBatchTranslator {
    fn name(&self) -> &str {
        "ai"
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<TranslationOutcome>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: self.build_prompt(texts),
            stream: false,
            options: OllamaOptions { temperature: 0.2, num_predict: 2048 },
        };

        let url = format!("{}/api/generate", self.base_url);
        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(TranslationError::ServiceUnavailable(format!("ollama returned {}", response.status())));
        }

        let body: OllamaResponse = response.json().await.map_err(|e| TranslationError::ParseError(e.to_string()))?;
        let parsed = parse_numbered_response(&body.response, texts.len());

        Ok(texts
            .iter()
            .zip(parsed)
            .map(|(source, translated)| TranslationOutcome {
                source_text: source.clone(),
                translated_text: translated.filter(|t| !t.trim().is_empty()),
            })
            .collect())
    }
}

fn parse_numbered_response(response: &str, expected_count: usize) -> Vec<Option<String>> {
    let mut results = Vec::with_capacity(expected_count);
    for i in 1..=expected_count {
        let marker = format!("[{i}]");
        let next_marker = format!("[{}]", i + 1);
        let extracted = response.find(&marker).map(|start| {
            let text_start = start + marker.len();
            let text_end = response[text_start..]
                .find(&next_marker)
                .map(|pos| text_start + pos)
                .unwrap_or(response.len());
            response[text_start..text_end].trim().to_string()
        });
        results.push(extracted);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_lines_in_order() {
        let response = "[1] 汤姆·哈迪\n[2] 李云龙";
        let parsed = parse_numbered_response(response, 2);
        assert_eq!(parsed[0].as_deref(), Some("汤姆·哈迪"));
        assert_eq!(parsed[1].as_deref(), Some("李云龙"));
    }

    #[test]
    fn missing_entries_yield_none() {
        let response = "[1] 汤姆·哈迪";
        let parsed = parse_numbered_response(response, 2);
        assert_eq!(parsed[1], None);
    }
}
