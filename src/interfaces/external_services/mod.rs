//! External Service Interfaces
//!
//! Defines interfaces for the external services this crate depends on.
//! Following Interface Segregation Principle (ISP), services are split into
//! focused traits.

pub mod douban_service;
pub mod media_server_service;
pub mod subscribe_service;
pub mod tmdb_service;
pub mod translator_service;

pub use douban_service::{DoubanActingResult, DoubanActor, DoubanCelebrityDetails, DoubanService};
pub use media_server_service::{
    ImageKind, LibraryItem, MediaServerItem, MediaServerService, PersonRef, ProviderIds,
};
pub use subscribe_service::SubscribeService;
pub use tmdb_service::{
    TmdbCastMember, TmdbCollectionDetails, TmdbCollectionPart, TmdbPersonCredit, TmdbPersonDetails,
    TmdbPersonMatch, TmdbPersonService, TmdbService, TmdbTitleDetails, TmdbTitleService,
};
pub use translator_service::{TranslationOutcome, TranslatorEngine};
