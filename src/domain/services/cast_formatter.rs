//! Final formatting pass over a translated cast list (spec.md §4.3 step 6).

use std::collections::HashSet;

use crate::domain::entities::CastMember;
use crate::domain::value_objects::role::is_placeholder_role;
use crate::shared::text::{contains_chinese, dedup_with_zero_width_space, strip_zero_width_space, CjkSpaceStripper};

pub const GENERIC_ROLE_ANIMATION: &str = "配音";
pub const GENERIC_ROLE_LIVE_ACTION: &str = "演员";

pub fn is_animation(genres: &[String]) -> bool {
    genres.iter().any(|g| g == "Animation" || g == "动画" || g == "动漫")
}

pub struct FormatOptions {
    pub is_animation: bool,
    pub role_prefix_enabled: bool,
}

/// Cap a seeded cast list at `max_actors`, keeping the lowest `sort_order`
/// entries (spec.md §4.3 step 4). A no-op when already within the limit.
pub fn truncate_to_limit(mut members: Vec<CastMember>, max_actors: usize) -> Vec<CastMember> {
    if members.len() > max_actors {
        members.sort_by_key(|m| m.sort_order());
        members.truncate(max_actors);
    }
    members
}

/// Apply spec.md §4.3 step 6 to an already-translated cast list: space
/// stripping, generic-role substitution, optional role prefixing, name
/// dedup via zero-width-space suffixing, and the final generic-roles-last
/// sort with sequential re-ordering.
pub fn format_cast(mut members: Vec<CastMember>, options: &FormatOptions) -> Vec<CastMember> {
    let original_order: Vec<i32> = members.iter().map(|m| m.sort_order()).collect();

    for member in members.iter_mut() {
        if contains_chinese(&member.name) {
            member.name = CjkSpaceStripper::strip(&member.name);
        }

        if member.role.trim().is_empty() {
            member.role = if options.is_animation {
                GENERIC_ROLE_ANIMATION
            } else {
                GENERIC_ROLE_LIVE_ACTION
            }
            .to_string();
        }

        if options.role_prefix_enabled && !member.role.is_empty() && !is_placeholder_role(&member.role) {
            let prefix = if options.is_animation { "配 " } else { "饰 " };
            if !member.role.starts_with(prefix) {
                member.role = format!("{prefix}{}", member.role);
            }
        }
    }

    let mut taken: HashSet<String> = HashSet::new();
    for member in members.iter_mut() {
        let canonical = strip_zero_width_space(&member.name);
        member.name = dedup_with_zero_width_space(canonical, &mut taken);
    }

    let mut indexed: Vec<(usize, CastMember)> = members.into_iter().enumerate().collect();
    indexed.sort_by_key(|(i, m)| {
        let generic = m.role == GENERIC_ROLE_ANIMATION || m.role == GENERIC_ROLE_LIVE_ACTION;
        (generic, original_order[*i])
    });

    indexed
        .into_iter()
        .enumerate()
        .map(|(order, (_, mut m))| {
            m.order = Some(order as i32);
            m
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn member(name: &str, role: &str, order: i32) -> CastMember {
        CastMember {
            tmdb_person_id: None,
            douban_celebrity_id: None,
            emby_person_id: None,
            name: name.to_string(),
            original_name: None,
            role: role.to_string(),
            order: Some(order),
            profile_path: None,
        }
    }

    #[test]
    fn empty_role_gets_generic_substitute() {
        let out = format_cast(
            vec![member("张译", "", 0)],
            &FormatOptions { is_animation: false, role_prefix_enabled: false },
        );
        assert_eq!(out[0].role, "演员");
    }

    #[test]
    fn animation_uses_voice_substitute() {
        let out = format_cast(
            vec![member("张译", "", 0)],
            &FormatOptions { is_animation: true, role_prefix_enabled: false },
        );
        assert_eq!(out[0].role, "配音");
    }

    #[test]
    fn role_prefix_skips_generic_roles() {
        let out = format_cast(
            vec![member("张译", "李云龙", 0), member("王宝强", "", 1)],
            &FormatOptions { is_animation: false, role_prefix_enabled: true },
        );
        assert_eq!(out[0].role, "饰 李云龙");
        assert_eq!(out[1].role, "演员");
    }

    #[test]
    fn duplicate_names_get_zero_width_space_suffix() {
        let out = format_cast(
            vec![member("张译", "李云龙", 0), member("张译", "楚云飞", 1)],
            &FormatOptions { is_animation: false, role_prefix_enabled: false },
        );
        assert_eq!(strip_zero_width_space(&out[0].name), "张译");
        assert_eq!(strip_zero_width_space(&out[1].name), "张译");
        assert_ne!(out[0].name, out[1].name);
    }

    #[test]
    fn generic_roles_sort_last_and_orders_are_resequenced() {
        let out = format_cast(
            vec![member("A", "演员", 0), member("B", "队长", 1)],
            &FormatOptions { is_animation: false, role_prefix_enabled: false },
        );
        assert_eq!(out[0].name, "B");
        assert_eq!(out[0].order, Some(0));
        assert_eq!(out[1].name, "A");
        assert_eq!(out[1].order, Some(1));
    }

    #[test]
    fn full_width_space_is_stripped_from_cjk_names() {
        let out = format_cast(
            vec![member("张\u{3000}译", "李云龙", 0)],
            &FormatOptions { is_animation: false, role_prefix_enabled: false },
        );
        assert_eq!(out[0].name, "张译");
    }

    proptest! {
        /// Whatever names collide going in, formatting never loses or
        /// duplicates a cast member: the count is preserved, every output
        /// name is distinct, and `order` comes out as a dense 0..n sequence.
        #[test]
        fn formatting_preserves_count_and_yields_distinct_names_and_dense_order(
            names in proptest::collection::vec("[张译王宝强ABC]{1,4}", 1..8),
        ) {
            let input: Vec<CastMember> = names
                .iter()
                .enumerate()
                .map(|(i, n)| member(n, "某角色", i as i32))
                .collect();
            let input_len = input.len();
            let out = format_cast(input, &FormatOptions { is_animation: false, role_prefix_enabled: false });

            prop_assert_eq!(out.len(), input_len);

            let distinct: std::collections::HashSet<&str> = out.iter().map(|m| m.name.as_str()).collect();
            prop_assert_eq!(distinct.len(), out.len());

            let mut orders: Vec<i32> = out.iter().map(|m| m.order.unwrap()).collect();
            orders.sort();
            prop_assert_eq!(orders, (0..out.len() as i32).collect::<Vec<_>>());
        }

        /// Truncation never grows the list, always binds at `max_actors`
        /// when the seed count exceeds it, and is a no-op otherwise.
        #[test]
        fn truncation_binds_at_the_limit_and_never_grows_the_list(
            seed_count in 0usize..20,
            max_actors in 1usize..20,
        ) {
            let members: Vec<CastMember> = (0..seed_count).map(|i| member(&format!("n{i}"), "某角色", i as i32)).collect();
            let out = truncate_to_limit(members, max_actors);
            prop_assert_eq!(out.len(), seed_count.min(max_actors));
        }
    }
}
