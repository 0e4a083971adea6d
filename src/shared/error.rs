//! Shared error types for the application
//!
//! This module defines all error types used across the application,
//! following domain-driven design principles.

use thiserror::Error;

/// Domain errors - errors that occur in the domain layer
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Business rule violation: {0}")]
    BusinessRuleViolation(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Repository errors - errors that occur during data access
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    RepositoryError::Duplicate(db_err.message().to_string())
                } else if db_err.is_check_violation() {
                    RepositoryError::ConstraintViolation(db_err.message().to_string())
                } else {
                    RepositoryError::Database(db_err.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut => {
                RepositoryError::Connection("Connection pool timeout".to_string())
            }
            sqlx::Error::PoolClosed => {
                RepositoryError::Connection("Connection pool closed".to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// TMDB service errors
#[derive(Debug, Clone, Error)]
pub enum TmdbError {
    #[error("API error: {0}")]
    ApiError(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cache error: {0}")]
    CacheError(String),
    
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TmdbError::Network("Request timeout".to_string())
        } else if err.is_connect() {
            TmdbError::Network("Connection failed".to_string())
        } else {
            TmdbError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TmdbError {
    fn from(err: serde_json::Error) -> Self {
        TmdbError::Deserialization(err.to_string())
    }
}

/// Person identity map errors (C1)
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("external id too long: {0} bytes")]
    IdTooLong(usize),

    #[error("no identity row for map_id {0}")]
    NotFound(i64),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Douban adapter errors (C6)
#[derive(Debug, Clone, Error)]
pub enum DoubanError {
    #[error("network error: {0}")]
    Network(String),

    #[error("session cookie rejected or expired")]
    Unauthorized,

    #[error("rate limited, retry after {0}s")]
    RateLimited(u64),

    #[error("subject not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for DoubanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            DoubanError::Network(err.to_string())
        } else {
            DoubanError::Network(err.to_string())
        }
    }
}

/// Override cache writer errors (C10)
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no cached source JSON for tmdb id {0}")]
    SourceNotFound(String),

    #[error("invalid source cache JSON: {0}")]
    InvalidSourceJson(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}

impl From<serde_json::Error> for OverrideError {
    fn from(err: serde_json::Error) -> Self {
        OverrideError::Serialization(err.to_string())
    }
}

/// Task manager errors (C12)
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("a task is already running")]
    Busy,

    #[error("unknown task key: {0}")]
    UnknownKey(String),

    #[error("task was cancelled")]
    Cancelled,
}

/// Custom collection engine errors (C14)
#[derive(Debug, Clone, Error)]
pub enum CollectionError {
    #[error("unknown list provider: {0}")]
    UnknownProvider(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("tmdb error: {0}")]
    Tmdb(#[from] TmdbError),

    #[error("subscribe adapter error: {0}")]
    Subscribe(#[from] SubscribeError),
}

/// External download-automation adapter errors, raised by the auto-subscribe
/// task (C14) when it hands a missing member off to the acquisition queue.
#[derive(Debug, Clone, Error)]
pub enum SubscribeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for SubscribeError {
    fn from(err: reqwest::Error) -> Self {
        SubscribeError::Network(err.to_string())
    }
}

/// Filesystem errors
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Walk error: {0}")]
    WalkError(String),

    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(String),
}

/// Messaging/Event bus errors
#[derive(Debug, Clone, Error)]
pub enum MessagingError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Handler error: {0}")]
    HandlerError(String),

    #[error("Handler timeout: {0}")]
    HandlerTimeout(String),

    #[error("No subscribers for event: {0}")]
    NoSubscribers(String),

    #[error("Event bus error: {0}")]
    EventBusError(String),
}

impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        MessagingError::Serialization(err.to_string())
    }
}

/// Translation engine errors (C8: AI batch translator + bing/google/baidu
/// fallback engines)
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("translation rejected: output matched input")]
    Unchanged,

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("http error: {0}")]
    HttpError(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslationError::Timeout(err.to_string())
        } else {
            TranslationError::HttpError(err.to_string())
        }
    }
}

/// Application errors - errors that occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("TMDB error: {0}")]
    Tmdb(#[from] TmdbError),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Identity map error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Douban error: {0}")]
    Douban(#[from] DoubanError),

    #[error("Override writer error: {0}")]
    Override(#[from] OverrideError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    #[error("Subscribe adapter error: {0}")]
    Subscribe(#[from] SubscribeError),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
