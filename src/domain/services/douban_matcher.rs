//! Douban-candidate-to-seed matching (spec.md §4.3 step 2).

use crate::shared::text::normalize_for_matching;

/// The minimum view a Douban candidate needs to be matched against seed
/// cast records; concrete DTOs implement this rather than depending on it.
pub trait DoubanCandidate {
    fn douban_id(&self) -> Option<&str>;
    fn name(&self) -> &str;
    fn original_name(&self) -> Option<&str>;
}

/// The minimum view a seed cast record needs for matching.
pub trait SeedRecord {
    fn douban_id(&self) -> Option<&str>;
    fn name(&self) -> &str;
    fn original_name(&self) -> Option<&str>;
}

/// Find the index of the seed record a Douban candidate matches, by (a)
/// equal Douban ID, then (b) case-folded equality of candidate name or
/// original-name against seed name or original-name (4-way cross product).
pub fn find_seed_match<'a, S: SeedRecord>(
    candidate: &impl DoubanCandidate,
    seeds: &'a [S],
) -> Option<usize> {
    if let Some(douban_id) = candidate.douban_id() {
        if let Some(idx) = seeds.iter().position(|s| s.douban_id() == Some(douban_id)) {
            return Some(idx);
        }
    }

    let candidate_keys: Vec<String> = [Some(candidate.name()), candidate.original_name()]
        .into_iter()
        .flatten()
        .map(normalize_for_matching)
        .collect();

    seeds.iter().position(|seed| {
        let seed_keys: Vec<String> = [Some(seed.name()), seed.original_name()]
            .into_iter()
            .flatten()
            .map(normalize_for_matching)
            .collect();
        candidate_keys.iter().any(|ck| seed_keys.iter().any(|sk| sk == ck))
    })
}

/// Deduplicate Douban candidates: Douban-ID-first, then exact (normalized)
/// name, preserving first-seen order (spec.md §4.3 step 2).
pub fn dedup_candidates<C: DoubanCandidate + Clone>(candidates: Vec<C>) -> Vec<C> {
    let mut seen_ids = std::collections::HashSet::new();
    let mut seen_names = std::collections::HashSet::new();
    let mut out = Vec::new();

    for candidate in candidates {
        if let Some(id) = candidate.douban_id() {
            if !seen_ids.insert(id.to_string()) {
                continue;
            }
        } else {
            let key = normalize_for_matching(candidate.name());
            if !seen_names.insert(key) {
                continue;
            }
        }
        out.push(candidate);
    }
    out
}
