//! Entities - Objects with identity that persist across state changes

pub mod actor_subscription;
pub mod cast_record;
pub mod custom_collection;
pub mod log_entry;
pub mod media_metadata;
pub mod person_identity;
pub mod translation_entry;
pub mod watchlist;

pub use actor_subscription::ActorSubscription;
pub use cast_record::CastMember;
pub use custom_collection::{CollectionInfo, CustomCollection};
pub use log_entry::{FailedLogEntry, ProcessedLogEntry};
pub use media_metadata::MediaMetadata;
pub use person_identity::{PersonIdentity, UpsertCandidate};
pub use translation_entry::{TranslationEntry, TranslatorPrecedence};
pub use watchlist::WatchlistEntry;
