//! Manual-edit session cache (spec.md §5 concurrency note): holds an
//! operator's in-progress cast edit for one item between "open for editing"
//! and "save" or "abandon". Sessions are process-local, never persisted, and
//! exist purely so a draft edit survives a few round trips without being
//! clobbered by a concurrent processing run touching the same item.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entities::CastMember;

#[async_trait]
pub trait ManualEditSessionStore: Send + Sync {
    /// Opens (or reopens) a session for `item_id`. The first open seeds the
    /// draft with `current_cast`; a later open while the session is still
    /// live returns whatever draft is already in flight instead.
    async fn open(&self, item_id: &str, current_cast: Vec<CastMember>) -> Vec<CastMember>;

    /// Replaces the draft of an already-open session. A no-op if no session
    /// is open for `item_id`.
    async fn update(&self, item_id: &str, draft: Vec<CastMember>);

    /// Ends the session and returns its final draft, if one was open.
    async fn save(&self, item_id: &str) -> Option<Vec<CastMember>>;

    /// Ends the session and discards its draft.
    async fn abandon(&self, item_id: &str);
}

pub struct InMemoryManualEditSessionStore {
    sessions: Mutex<HashMap<String, Vec<CastMember>>>,
}

impl InMemoryManualEditSessionStore {
    pub fn new() -> Self {
        Self { sessions: Mutex::new(HashMap::new()) }
    }
}

impl Default for InMemoryManualEditSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManualEditSessionStore for InMemoryManualEditSessionStore {
    async fn open(&self, item_id: &str, current_cast: Vec<CastMember>) -> Vec<CastMember> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.entry(item_id.to_string()).or_insert(current_cast).clone()
    }

    async fn update(&self, item_id: &str, draft: Vec<CastMember>) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(slot) = sessions.get_mut(item_id) {
            *slot = draft;
        }
    }

    async fn save(&self, item_id: &str) -> Option<Vec<CastMember>> {
        self.sessions.lock().unwrap().remove(item_id)
    }

    async fn abandon(&self, item_id: &str) {
        self.sessions.lock().unwrap().remove(item_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> CastMember {
        CastMember {
            tmdb_person_id: None,
            douban_celebrity_id: None,
            emby_person_id: None,
            name: name.to_string(),
            original_name: None,
            role: String::new(),
            order: Some(0),
            profile_path: None,
        }
    }

    #[tokio::test]
    async fn opening_twice_returns_the_live_draft_not_the_fresh_seed() {
        let store = InMemoryManualEditSessionStore::new();
        let first = store.open("item-1", vec![member("A")]).await;
        assert_eq!(first.len(), 1);

        store.update("item-1", vec![member("A"), member("B")]).await;
        let second = store.open("item-1", vec![member("Z")]).await;
        assert_eq!(second.len(), 2, "reopening a live session must not reset the draft");
    }

    #[tokio::test]
    async fn save_ends_the_session_and_returns_the_draft() {
        let store = InMemoryManualEditSessionStore::new();
        store.open("item-2", vec![member("A")]).await;
        store.update("item-2", vec![member("A"), member("B")]).await;

        let saved = store.save("item-2").await.unwrap();
        assert_eq!(saved.len(), 2);
        assert!(store.save("item-2").await.is_none(), "the session no longer exists after save");
    }

    #[tokio::test]
    async fn abandon_discards_the_draft_without_returning_it() {
        let store = InMemoryManualEditSessionStore::new();
        store.open("item-3", vec![member("A")]).await;
        store.abandon("item-3").await;
        assert!(store.save("item-3").await.is_none());
    }

    #[tokio::test]
    async fn update_on_an_unopened_session_is_a_no_op() {
        let store = InMemoryManualEditSessionStore::new();
        store.update("item-4", vec![member("A")]).await;
        assert!(store.save("item-4").await.is_none());
    }
}
