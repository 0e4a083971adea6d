//! Cast quality score (spec.md §4.3.3) — used to flag a processed item as
//! "needs review" when the final cast list looks thin or poorly matched.

use crate::domain::value_objects::role::{is_placeholder_role, RoleTier};
use crate::shared::text::contains_chinese;

/// One actor's contribution to the averaged per-item score.
pub struct ScoredActor<'a> {
    pub name: &'a str,
    pub role: &'a str,
}

fn name_score(name: &str) -> f32 {
    if name.trim().is_empty() {
        0.0
    } else if contains_chinese(name) {
        5.0
    } else {
        1.0
    }
}

fn role_score(role: &str) -> f32 {
    if role.trim().is_empty() {
        0.0
    } else if !contains_chinese(role) {
        0.5
    } else if is_placeholder_role(role) {
        2.5
    } else {
        5.0
    }
}

/// Inputs that decide the count-penalty multiplier (spec.md §4.3.3).
pub struct CountPenaltyInput {
    pub final_count: usize,
    pub original_count: usize,
    pub expected_final_count: Option<usize>,
}

fn count_penalty(input: &CountPenaltyInput) -> f32 {
    let final_count = input.final_count as f32;
    if input.final_count < 10 {
        return final_count / 10.0;
    }
    if let Some(expected) = input.expected_final_count {
        if final_count < 0.8 * expected as f32 {
            return final_count / expected as f32;
        }
    }
    if final_count < 0.8 * input.original_count as f32 {
        return final_count / input.original_count as f32;
    }
    1.0
}

/// Compute the 0–10 quality score for a processed item's final cast.
///
/// `is_animation` titles skip the count penalty and default to a 7.0
/// baseline when the cast is empty; non-animation titles score 0.0 when
/// empty.
pub fn score_cast(actors: &[ScoredActor], is_animation: bool, penalty: CountPenaltyInput) -> f32 {
    if actors.is_empty() {
        return round1(if is_animation { 7.0 } else { 0.0 });
    }

    let base: f32 = actors
        .iter()
        .map(|a| name_score(a.name) + role_score(a.role))
        .sum::<f32>()
        / actors.len() as f32;
    let multiplier = if is_animation { 1.0 } else { count_penalty(&penalty) };

    round1(base * multiplier)
}

fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

/// Classify a role's tier, exposed for callers that need the raw tier
/// rather than the numeric score (e.g. diagnostics/logging).
pub fn role_tier(role: &str) -> RoleTier {
    crate::domain::value_objects::role::classify_role(role, contains_chinese)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn penalty(final_count: usize, original_count: usize) -> CountPenaltyInput {
        CountPenaltyInput { final_count, original_count, expected_final_count: None }
    }

    #[test]
    fn empty_cast_on_animation_is_seven() {
        assert_eq!(score_cast(&[], true, penalty(0, 0)), 7.0);
    }

    #[test]
    fn empty_cast_on_non_animation_is_zero() {
        assert_eq!(score_cast(&[], false, penalty(0, 0)), 0.0);
    }

    #[test]
    fn fully_translated_small_cast_is_penalized_by_count() {
        let actors = vec![ScoredActor { name: "张译", role: "李云龙" }];
        // max per-actor score is 5.0 (cjk name) + 5.0 (cjk meaningful role) = 10.0;
        // count penalty for a single-member cast is 1/10.
        let score = score_cast(&actors, false, penalty(1, 1));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn animation_skips_count_penalty() {
        let actors = vec![ScoredActor { name: "张译", role: "李云龙" }];
        let score = score_cast(&actors, true, penalty(1, 1));
        assert_eq!(score, 10.0);
    }

    #[test]
    fn expected_count_miss_still_falls_through_to_the_original_count_check() {
        // final=10 clears the flat `<10` rule; expected=20 fails the 0.8*expected
        // check (10 < 16) so that branch does NOT early-return 1.0 — it must
        // still check final against original_count (0.8*11 = 8.8, 10 is not below it).
        let input = CountPenaltyInput { final_count: 10, original_count: 11, expected_final_count: Some(20) };
        assert_eq!(count_penalty(&input), 1.0);

        // Same expected-count miss, but original_count is large enough that the
        // fallthrough check DOES trigger a penalty: 10 < 0.8*15 = 12.
        let input = CountPenaltyInput { final_count: 10, original_count: 15, expected_final_count: Some(20) };
        assert_eq!(count_penalty(&input), 10.0 / 15.0);
    }

    #[test]
    fn untranslated_latin_cast_scores_low() {
        let actors: Vec<ScoredActor> = (0..12).map(|_| ScoredActor { name: "Tom Hanks", role: "actor" }).collect();
        // name=1.0 (latin), role=0.5 (non-cjk) -> base 1.5, no count penalty (12 >= 10, 0.8*12=9.6)
        let score = score_cast(&actors, false, penalty(12, 12));
        assert_eq!(score, 1.5);
    }
}
