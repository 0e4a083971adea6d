//! CJK detection and whitespace handling for cast names and roles.
//!
//! The ranges and the name-normalization recipe (NFKD fold, strip
//! diacritics, lowercase, alnum-only) mirror the matching rules used by the
//! Douban-matching step, so that "José" and "jose" compare equal the same
//! way they do there.

use unicode_normalization::UnicodeNormalization;

/// Whether `s` contains at least one CJK Unified Ideograph (including the
/// compatibility and extension-A blocks actually seen in cast/role text).
pub fn contains_chinese(s: &str) -> bool {
    s.chars().any(is_cjk_char)
}

fn is_cjk_char(c: char) -> bool {
    let cp = c as u32;
    (0x4E00..=0x9FFF).contains(&cp) || (0x3400..=0x4DBF).contains(&cp) || (0xF900..=0xFAFF).contains(&cp)
}

/// Full-width space (U+3000) and ordinary ASCII space stripping for
/// CJK text, where the server or catalog sometimes pads role/name strings.
pub struct CjkSpaceStripper;

impl CjkSpaceStripper {
    pub fn strip(s: &str) -> String {
        s.chars().filter(|&c| c != '\u{3000}' && c != ' ').collect()
    }
}

/// Case/diacritic/punctuation-insensitive key for cross-matching a server
/// name against a Douban name or original_name: NFKD-normalize, drop
/// combining marks, keep only alphanumerics, lowercase.
pub fn normalize_for_matching(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
}

/// Zero-width space (U+200B) is used as a dedup suffix: appending one or
/// more keeps otherwise-identical display names distinct for the media
/// server's cast list, without changing what's rendered on screen.
pub fn strip_zero_width_space(s: &str) -> String {
    s.chars().filter(|&c| c != '\u{200B}').collect()
}

/// Append zero-width spaces until `candidate` is absent from `taken`,
/// then reserve it.
pub fn dedup_with_zero_width_space(candidate: String, taken: &mut std::collections::HashSet<String>) -> String {
    let mut name = candidate;
    while taken.contains(&name) {
        name.push('\u{200B}');
    }
    taken.insert(name.clone());
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn detects_han_ideographs() {
        assert!(contains_chinese("张译"));
        assert!(!contains_chinese("Zhang Yi"));
    }

    #[test]
    fn strips_full_width_and_ascii_spaces() {
        assert_eq!(CjkSpaceStripper::strip("张 译\u{3000}"), "张译");
    }

    #[test]
    fn normalizes_diacritics_and_case_for_matching() {
        assert_eq!(normalize_for_matching("José García"), normalize_for_matching("jose garcia"));
    }

    #[test]
    fn dedup_suffixing_is_stable_and_distinct() {
        let mut taken = HashSet::new();
        let a = dedup_with_zero_width_space("张译".to_string(), &mut taken);
        let b = dedup_with_zero_width_space("张译".to_string(), &mut taken);
        assert_eq!(a, "张译");
        assert_ne!(a, b);
        assert_eq!(strip_zero_width_space(&b), "张译");
    }

    proptest! {
        /// Running the same candidate name through the dedup pass N times
        /// (simulating N cast members sharing a display name) always yields
        /// N pairwise-distinct strings that all strip back to the original.
        #[test]
        fn repeated_candidates_dedup_to_distinct_strings_that_strip_back(
            name in "[张译李云龙a-zA-Z]{1,8}",
            count in 1usize..8,
        ) {
            let mut taken = HashSet::new();
            let mut produced = Vec::with_capacity(count);
            for _ in 0..count {
                let suffixed = dedup_with_zero_width_space(name.clone(), &mut taken);
                prop_assert_eq!(strip_zero_width_space(&suffixed), name.clone());
                produced.push(suffixed);
            }
            let distinct: HashSet<_> = produced.iter().cloned().collect();
            prop_assert_eq!(distinct.len(), produced.len());
        }
    }
}
