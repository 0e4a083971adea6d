//! Application Layer
//!
//! Orchestrates domain services and infrastructure adapters into the
//! operations the rest of the system calls: translation (C2+C8), cast
//! processing (C9), identity enrichment (C11), webhook handling (C13), and
//! collection maintenance (C14).

pub mod services;

pub use services::cast_processor::{CastProcessor, ProcessedCast};
pub use services::collection_engine::CollectionEngine;
pub use services::identity_enricher::IdentityEnricher;
pub use services::manual_edit_session::{InMemoryManualEditSessionStore, ManualEditSessionStore};
pub use services::translation_service::TranslationService;
pub use services::webhook_router::WebhookRouter;
