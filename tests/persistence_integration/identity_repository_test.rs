//! Property-level coverage of the person identity map against a real
//! SQLite pool: identity uniqueness and upsert order-independence.

use sqlx::sqlite::SqlitePoolOptions;

use castlinkd::domain::entities::UpsertCandidate;
use castlinkd::domain::repositories::IdentityRepository;
use castlinkd::infrastructure::database::initialize_schema;
use castlinkd::infrastructure::persistence::sqlite::SqliteIdentityRepository;

async fn repo() -> SqliteIdentityRepository {
    let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
    initialize_schema(&pool).await.unwrap();
    SqliteIdentityRepository::new(pool)
}

fn candidate(
    name: Option<&str>,
    tmdb: Option<&str>,
    emby: Option<&str>,
    imdb: Option<&str>,
    douban: Option<&str>,
) -> UpsertCandidate {
    UpsertCandidate {
        name: name.map(str::to_string),
        tmdb_person_id: tmdb.map(str::to_string),
        emby_person_id: emby.map(str::to_string),
        imdb_id: imdb.map(str::to_string),
        douban_celebrity_id: douban.map(str::to_string),
    }
}

/// Testable property 1: for every non-null external ID field across all
/// rows, the (field, value) pair occurs at most once. Exercised here by
/// driving two rows toward a shared tmdb id and checking exactly one
/// survives, holding every ID either side contributed.
#[tokio::test]
async fn upsert_never_lets_two_rows_share_an_external_id() {
    let repo = repo().await;

    repo.upsert(candidate(Some("Jon Hamm"), Some("T1"), Some("E1"), None, None)).await.unwrap();
    // Same tmdb id from a different source payload round — must merge, not duplicate.
    repo.upsert(candidate(Some("Jon Hamm"), Some("T1"), None, None, Some("D1"))).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    let row = repo.find_by_tmdb_id("T1").await.unwrap().unwrap();
    assert_eq!(row.emby_person_id.as_deref(), Some("E1"));
    assert_eq!(row.douban_celebrity_id.as_deref(), Some("D1"));
}

/// Testable property 2: upsert convergence — the same set of overlapping-ID
/// candidates, applied in any order, converges to one row holding every ID,
/// independent of the order they arrived in.
#[tokio::test]
async fn upsert_converges_regardless_of_arrival_order() {
    let forward = repo().await;
    forward.upsert(candidate(None, Some("T9"), None, None, None)).await.unwrap();
    forward.upsert(candidate(None, None, Some("E9"), None, None)).await.unwrap();
    forward.upsert(candidate(Some("Actor Nine"), Some("T9"), Some("E9"), Some("I9"), Some("D9"))).await.unwrap();

    let reversed = repo().await;
    reversed.upsert(candidate(None, None, Some("E9"), None, None)).await.unwrap();
    reversed.upsert(candidate(None, Some("T9"), None, None, None)).await.unwrap();
    reversed.upsert(candidate(Some("Actor Nine"), Some("T9"), Some("E9"), Some("I9"), Some("D9"))).await.unwrap();

    assert_eq!(forward.count().await.unwrap(), 1);
    assert_eq!(reversed.count().await.unwrap(), 1);

    let a = forward.find_by_tmdb_id("T9").await.unwrap().unwrap();
    let b = reversed.find_by_tmdb_id("T9").await.unwrap().unwrap();

    assert_eq!(a.tmdb_person_id, b.tmdb_person_id);
    assert_eq!(a.emby_person_id, b.emby_person_id);
    assert_eq!(a.imdb_id, b.imdb_id);
    assert_eq!(a.douban_celebrity_id, b.douban_celebrity_id);
    assert_eq!(a.primary_name, b.primary_name);
}

#[tokio::test]
async fn three_rows_discovered_via_different_ids_merge_into_one_on_a_unifying_upsert() {
    let repo = repo().await;
    let a = repo.upsert(candidate(None, Some("T1"), None, None, None)).await.unwrap();
    let b = repo.upsert(candidate(None, None, Some("E1"), None, None)).await.unwrap();
    let c = repo.upsert(candidate(None, None, None, None, Some("D1"))).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 3);

    let merged = repo
        .upsert(candidate(Some("Jon Hamm"), Some("T1"), Some("E1"), None, Some("D1")))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(merged.map_id, a.map_id.min(b.map_id).min(c.map_id));
    assert_eq!(merged.tmdb_person_id.as_deref(), Some("T1"));
    assert_eq!(merged.emby_person_id.as_deref(), Some("E1"));
    assert_eq!(merged.douban_celebrity_id.as_deref(), Some("D1"));
}
