//! Role classification used by role selection (spec.md §4.3.1) and the
//! quality scorer (§4.3.3).

/// Role strings that carry no information about the character played.
pub const PLACEHOLDER_ROLES: [&str; 4] = ["actor", "actress", "演员", "配音"];

/// True if `role` case-insensitively matches one of the generic placeholders.
pub fn is_placeholder_role(role: &str) -> bool {
    let trimmed = role.trim();
    if trimmed.is_empty() {
        return false;
    }
    PLACEHOLDER_ROLES
        .iter()
        .any(|p| p.eq_ignore_ascii_case(trimmed) || *p == trimmed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTier {
    Empty,
    Placeholder,
    NonCjk,
    Cjk,
}

/// Classifies a (non-empty-checked) role string for role-selection priority.
pub fn classify_role(role: &str, contains_cjk: impl Fn(&str) -> bool) -> RoleTier {
    let trimmed = role.trim();
    if trimmed.is_empty() {
        RoleTier::Empty
    } else if is_placeholder_role(trimmed) {
        RoleTier::Placeholder
    } else if contains_cjk(trimmed) {
        RoleTier::Cjk
    } else {
        RoleTier::NonCjk
    }
}
