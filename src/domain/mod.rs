//! Domain Layer - Pure business logic and domain models
//!
//! This layer contains:
//! - Entities: Core business objects with identity
//! - Value Objects: Immutable objects defined by their attributes
//! - Domain Services: Stateless services containing business logic
//! - Repository Interfaces: Abstractions for data access
//! - Domain Events: Events that occur within the domain

pub mod entities;
pub mod events;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::{
    ActorSubscription, CastMember, CollectionInfo, CustomCollection, FailedLogEntry, MediaMetadata,
    PersonIdentity, ProcessedLogEntry, TranslationEntry, TranslatorPrecedence, UpsertCandidate,
    WatchlistEntry,
};
pub use events::{CastProcessedEvent, ImageUpdatedEvent, ItemAddedEvent, TaskCompletedEvent};
pub use value_objects::{
    CollectionDefinition, ExternalIdKind, FilterNode, HealthStatus, ItemType, MemberStatus, RoleTier,
    TaskKey,
};
