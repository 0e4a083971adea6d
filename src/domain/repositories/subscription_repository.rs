//! SubscriptionRepository trait — actor subscriptions driving the Actor
//! Tracking task key (spec.md §3).

use async_trait::async_trait;

use crate::domain::entities::ActorSubscription;
use crate::shared::error::RepositoryError;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn subscribe(&self, subscription: ActorSubscription) -> Result<(), RepositoryError>;

    async fn unsubscribe(&self, person_map_id: i64) -> Result<(), RepositoryError>;

    async fn find_all(&self) -> Result<Vec<ActorSubscription>, RepositoryError>;

    async fn update_known_credits(&self, person_map_id: i64, known_credit_tmdb_ids: Vec<String>) -> Result<(), RepositoryError>;
}
