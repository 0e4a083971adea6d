//! Application Services
//!
//! Each service coordinates domain logic with one or more infrastructure
//! ports for a single top-level operation.

pub mod cast_processor;
pub mod collection_engine;
pub mod identity_enricher;
pub mod manual_edit_session;
pub mod translation_service;
pub mod webhook_router;

pub use cast_processor::{CastProcessor, ProcessedCast};
pub use collection_engine::CollectionEngine;
pub use identity_enricher::IdentityEnricher;
pub use manual_edit_session::{InMemoryManualEditSessionStore, ManualEditSessionStore};
pub use translation_service::TranslationService;
pub use webhook_router::WebhookRouter;
