//! Character-name cleaning (spec.md §4.3.2).
//!
//! Strips bracketed suffixes and leading/trailing "as"/饰/饰演/配/配音
//! markers, and collapses a mixed CJK+Latin name down to its CJK part.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::text::contains_chinese;

static BRACKETED_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\(（\[［][^\)）\]］]*[\)）\]］]\s*$").unwrap());

static LEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(as\s+|饰演|饰|配音|配)\s*").unwrap());

static TRAILING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(饰演|饰|配音|配)\s*$").unwrap());

/// `^(CJK sequence)(non-Latin separator)(Latin …)$` — a Douban convention
/// for listing a character's Chinese name followed by a romanization.
static MIXED_CJK_LATIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\p{Han}]+)[\s/,，·-]+([A-Za-z].*)$").unwrap());

pub fn clean_character_name(raw: &str) -> String {
    let mut name = raw.trim().to_string();

    loop {
        let stripped = BRACKETED_SUFFIX.replace(&name, "").trim().to_string();
        if stripped == name {
            break;
        }
        name = stripped;
    }

    name = LEADING_MARKER.replace(&name, "").trim().to_string();
    name = TRAILING_MARKER.replace(&name, "").trim().to_string();

    if let Some(caps) = MIXED_CJK_LATIN.captures(&name) {
        let cjk_part = caps.get(1).unwrap().as_str();
        if contains_chinese(cjk_part) {
            return cjk_part.trim().to_string();
        }
    }

    name
}
