//! Pre-filters that bypass translation entirely (spec.md §4.2).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::text::contains_chinese;

static ALL_CAPS_INITIALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{1,2}$").unwrap());

/// Empty/whitespace text, text that already contains CJK characters, and
/// one/two-letter all-caps initials never go through a translator call.
pub fn should_bypass_translation(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || contains_chinese(trimmed) || ALL_CAPS_INITIALS.is_match(trimmed)
}
