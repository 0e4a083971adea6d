//! Environment-variable configuration, read once at startup.

use anyhow::{Context, Result};

pub struct Config {
    pub database_url: String,
    pub media_server_url: String,
    pub media_server_api_key: String,
    pub tmdb_api_key: String,
    pub douban_cookie: Option<String>,
    pub douban_cooldown_secs: u64,
    pub local_cache_root: String,
    pub override_root: String,
    pub max_actors: usize,
    pub min_score_for_review: f32,
    pub translation_engine_order: Vec<String>,
    pub ai_translator_base_url: String,
    pub ai_translator_model: String,
    pub baidu_app_id: Option<String>,
    pub baidu_app_secret: Option<String>,
    pub role_prefix_enabled: bool,
    pub pretranslate_native_names: bool,
    pub enricher_wall_clock_secs: u64,
    pub override_mirror_delay_ms: u64,
    pub subscribe_base_url: String,
    pub subscribe_api_key: String,
    pub webhook_token: Option<String>,
    pub port: u16,
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required environment variable {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env_or("DATABASE_URL", "sqlite:castlinkd.db?mode=rwc"),
            media_server_url: env_var("MEDIA_SERVER_URL")?,
            media_server_api_key: env_var("MEDIA_SERVER_API_KEY")?,
            tmdb_api_key: env_var("TMDB_API_KEY")?,
            douban_cookie: std::env::var("DOUBAN_COOKIE").ok(),
            douban_cooldown_secs: env_or("DOUBAN_COOLDOWN_SECS", "3").parse().unwrap_or(3),
            local_cache_root: env_or("LOCAL_CACHE_ROOT", "/data/local-cache"),
            override_root: env_or("OVERRIDE_ROOT", "/data/override"),
            max_actors: env_or("MAX_ACTORS", "30").parse().unwrap_or(30),
            min_score_for_review: env_or("MIN_SCORE_FOR_REVIEW", "6.0").parse().unwrap_or(6.0),
            translation_engine_order: env_or("TRANSLATION_ENGINE_ORDER", "bing,google,baidu")
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            ai_translator_base_url: env_or("AI_TRANSLATOR_BASE_URL", "http://localhost:11434"),
            ai_translator_model: env_or("AI_TRANSLATOR_MODEL", "llama3"),
            baidu_app_id: std::env::var("BAIDU_APP_ID").ok(),
            baidu_app_secret: std::env::var("BAIDU_APP_SECRET").ok(),
            role_prefix_enabled: env_or("ROLE_PREFIX_ENABLED", "false").parse().unwrap_or(false),
            pretranslate_native_names: env_or("PRETRANSLATE_NATIVE_NAMES", "false").parse().unwrap_or(false),
            enricher_wall_clock_secs: env_or("ENRICHER_WALL_CLOCK_SECS", "1800").parse().unwrap_or(1800),
            override_mirror_delay_ms: env_or("OVERRIDE_MIRROR_DELAY_MS", "0").parse().unwrap_or(0),
            subscribe_base_url: env_or("SUBSCRIBE_BASE_URL", "http://localhost:3000"),
            subscribe_api_key: env_or("SUBSCRIBE_API_KEY", ""),
            webhook_token: std::env::var("WEBHOOK_TOKEN").ok(),
            port: env_or("PORT", "8787").parse().unwrap_or(8787),
        })
    }
}
