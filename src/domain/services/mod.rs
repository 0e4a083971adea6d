//! Domain services - pure, side-effect-free business logic that does not
//! belong to a single entity.

pub mod cast_formatter;
pub mod character_cleaner;
pub mod collection_filter;
pub mod douban_matcher;
pub mod override_cast;
pub mod quality_scorer;
pub mod role_selector;
pub mod translation_filter;

pub use cast_formatter::{format_cast, is_animation, truncate_to_limit, FormatOptions};
pub use character_cleaner::clean_character_name;
pub use collection_filter::matches as matches_filter;
pub use douban_matcher::{dedup_candidates, find_seed_match, DoubanCandidate, SeedRecord};
pub use override_cast::{derive_credit_id, to_override_cast_array, OverrideCastRecord};
pub use quality_scorer::{score_cast, CountPenaltyInput, ScoredActor};
pub use role_selector::select_role;
pub use translation_filter::should_bypass_translation;
