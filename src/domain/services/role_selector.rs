//! Role selection (spec.md §4.3.1) — a pure, heavily property-tested
//! decision used both by Douban-match replacement and final formatting.

use crate::domain::value_objects::role::{is_placeholder_role, RoleTier};
use crate::shared::text::contains_chinese;

fn classify(role: &str) -> RoleTier {
    crate::domain::value_objects::role::classify_role(role, contains_chinese)
}

/// Choose between the role already on a cast record (`current`) and a
/// freshly observed one (`candidate`), by descending priority:
///
/// 1. non-placeholder CJK candidate
/// 2. non-placeholder CJK current (protects hand-edited data)
/// 3. non-placeholder non-CJK (candidate preferred)
/// 4. placeholder (candidate preferred)
/// 5. empty string
pub fn select_role<'a>(current: &'a str, candidate: &'a str) -> &'a str {
    let current_tier = classify(current);
    let candidate_tier = classify(candidate);

    if candidate_tier == RoleTier::Cjk && !is_placeholder_role(candidate) {
        return candidate;
    }
    if current_tier == RoleTier::Cjk && !is_placeholder_role(current) {
        return current;
    }
    if candidate_tier == RoleTier::NonCjk {
        return candidate;
    }
    if current_tier == RoleTier::NonCjk {
        return current;
    }
    if candidate_tier == RoleTier::Placeholder {
        return candidate;
    }
    if current_tier == RoleTier::Placeholder {
        return current;
    }
    ""
}
