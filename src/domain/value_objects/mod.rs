//! Value Objects - Immutable objects defined by their attributes

pub mod collection_definition;
pub mod external_ids;
pub mod item_type;
pub mod member_status;
pub mod role;
pub mod task_key;

pub use collection_definition::{CollectionDefinition, FilterNode};
pub use external_ids::{normalize_external_id, normalize_name, ExternalIdError, ExternalIdKind, MAX_EXTERNAL_ID_LEN};
pub use item_type::ItemType;
pub use member_status::{derive_health, HealthStatus, MemberStatus};
pub use role::{classify_role, is_placeholder_role, RoleTier, PLACEHOLDER_ROLES};
pub use task_key::TaskKey;
