//! Maps a processed in-memory cast list to the TMDb-shaped cast record the
//! override JSON persists (spec.md §6: "Persisted override JSON").

use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::CastMember;

#[derive(Debug, Clone, Serialize)]
pub struct OverrideCastRecord {
    pub id: i64,
    pub name: String,
    pub original_name: String,
    pub character: String,
    pub order: i32,
    pub adult: bool,
    pub gender: i32,
    pub known_for_department: String,
    pub popularity: f64,
    pub profile_path: Option<String>,
    pub cast_id: i64,
    pub credit_id: String,
}

impl OverrideCastRecord {
    /// `order=-1` mirrors the source schema's convention for a record
    /// promoted from Douban overflow with no position of its own
    /// (spec.md §4.3 step 3, §6).
    pub fn from_cast_member(member: &CastMember, credit_id: &str) -> Self {
        let id = member.tmdb_person_id.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0);
        Self {
            id,
            name: member.name.clone(),
            original_name: member.original_name.clone().unwrap_or_else(|| member.name.clone()),
            character: member.role.clone(),
            order: member.order.unwrap_or(-1),
            adult: false,
            gender: 0,
            known_for_department: "Acting".to_string(),
            popularity: 0.0,
            profile_path: member.profile_path.clone(),
            cast_id: id,
            credit_id: credit_id.to_string(),
        }
    }
}

/// Deterministic `credit_id` so repeated runs over the same cast produce
/// byte-identical override JSON (useful for diffing and for tests).
pub fn derive_credit_id(member: &CastMember, position: usize) -> String {
    let seed = member
        .tmdb_person_id
        .as_deref()
        .or(member.douban_celebrity_id.as_deref())
        .unwrap_or(&member.name);
    format!("{seed}-{position}")
}

pub fn to_override_cast_array(cast: &[CastMember]) -> Value {
    let records: Vec<OverrideCastRecord> = cast
        .iter()
        .enumerate()
        .map(|(i, m)| OverrideCastRecord::from_cast_member(m, &derive_credit_id(m, i)))
        .collect();
    serde_json::to_value(records).expect("cast records always serialize")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> CastMember {
        CastMember {
            tmdb_person_id: Some("123".into()),
            douban_celebrity_id: None,
            emby_person_id: None,
            name: "张译".into(),
            original_name: Some("Zhang Yi".into()),
            role: "李云龙".into(),
            order: Some(0),
            profile_path: None,
        }
    }

    #[test]
    fn maps_known_fields_and_defaults_the_rest() {
        let record = OverrideCastRecord::from_cast_member(&member(), "123-0");
        assert_eq!(record.id, 123);
        assert_eq!(record.name, "张译");
        assert_eq!(record.character, "李云龙");
        assert!(!record.adult);
        assert_eq!(record.gender, 0);
        assert_eq!(record.order, 0);
    }

    #[test]
    fn missing_order_defaults_to_negative_one() {
        let mut m = member();
        m.order = None;
        let record = OverrideCastRecord::from_cast_member(&m, "x");
        assert_eq!(record.order, -1);
    }

    #[test]
    fn array_round_trips_through_json() {
        let value = to_override_cast_array(&[member()]);
        assert!(value.is_array());
        assert_eq!(value[0]["name"], "张译");
    }
}
