//! SQLite implementation of SubscriptionRepository (actor tracking).

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use crate::domain::entities::ActorSubscription;
use crate::domain::repositories::SubscriptionRepository;
use crate::shared::error::RepositoryError;

pub struct SqliteSubscriptionRepository {
    pool: Pool<Sqlite>,
}

impl SqliteSubscriptionRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn row_to_subscription(row: &sqlx::sqlite::SqliteRow) -> Result<ActorSubscription, RepositoryError> {
    let known_credits: String = row.get("known_credit_tmdb_ids");
    Ok(ActorSubscription {
        person_map_id: row.get("person_map_id"),
        display_name: row.get("display_name"),
        subscribed_at: row.get("subscribed_at"),
        known_credit_tmdb_ids: serde_json::from_str(&known_credits)?,
    })
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn subscribe(&self, subscription: ActorSubscription) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO actor_subscription (person_map_id, display_name, subscribed_at, known_credit_tmdb_ids)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(person_map_id) DO UPDATE SET
                display_name = excluded.display_name",
        )
        .bind(subscription.person_map_id)
        .bind(&subscription.display_name)
        .bind(subscription.subscribed_at)
        .bind(serde_json::to_string(&subscription.known_credit_tmdb_ids)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unsubscribe(&self, person_map_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM actor_subscription WHERE person_map_id = ?")
            .bind(person_map_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<ActorSubscription>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM actor_subscription").fetch_all(&self.pool).await?;
        rows.iter().map(row_to_subscription).collect()
    }

    async fn update_known_credits(&self, person_map_id: i64, known_credit_tmdb_ids: Vec<String>) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE actor_subscription SET known_credit_tmdb_ids = ? WHERE person_map_id = ?")
            .bind(serde_json::to_string(&known_credit_tmdb_ids)?)
            .bind(person_map_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> (SqliteSubscriptionRepository, Pool<Sqlite>) {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        crate::infrastructure::database::initialize_schema(&pool).await.unwrap();
        (SqliteSubscriptionRepository::new(pool.clone()), pool)
    }

    async fn seed_identity(pool: &Pool<Sqlite>) -> i64 {
        let row = sqlx::query(
            "INSERT INTO person_identity_map (primary_name, last_updated_at) VALUES (?, ?) RETURNING map_id",
        )
        .bind("Tony Leung")
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .unwrap();
        row.get("map_id")
    }

    #[tokio::test]
    async fn subscribing_then_updating_known_credits_round_trips() {
        let (repo, pool) = setup().await;
        let map_id = seed_identity(&pool).await;
        repo.subscribe(ActorSubscription {
            person_map_id: map_id,
            display_name: "Tony Leung".into(),
            subscribed_at: Utc::now(),
            known_credit_tmdb_ids: vec![],
        })
        .await
        .unwrap();

        repo.update_known_credits(map_id, vec!["100".into(), "200".into()]).await.unwrap();
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].known_credit_tmdb_ids, vec!["100", "200"]);

        repo.unsubscribe(map_id).await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
