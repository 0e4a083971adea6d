//! Testable property 3: log mutual exclusion. An item id never appears in
//! both the processed-log and the failed-log at once.

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;

use castlinkd::domain::entities::{FailedLogEntry, ProcessedLogEntry};
use castlinkd::domain::repositories::LogRepository;
use castlinkd::infrastructure::database::initialize_schema;
use castlinkd::infrastructure::persistence::sqlite::SqliteLogRepository;

async fn repo() -> SqliteLogRepository {
    let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
    initialize_schema(&pool).await.unwrap();
    SqliteLogRepository::new(pool)
}

async fn assert_mutually_exclusive(repo: &SqliteLogRepository, item_ids: &[&str]) {
    let processed: Vec<String> = repo.find_needing_review(100).await.unwrap().into_iter().map(|e| e.item_id).collect();
    let failed: Vec<String> = repo.find_recent_failures(100).await.unwrap().into_iter().map(|e| e.item_id).collect();

    for id in item_ids {
        let in_processed = processed.iter().any(|p| p == id);
        let in_failed = failed.iter().any(|f| f == id);
        assert!(!(in_processed && in_failed), "item {id} present in both logs");
        assert!(in_processed || in_failed, "item {id} missing from both logs after an attempt");
    }
}

#[tokio::test]
async fn a_task_run_with_mixed_outcomes_keeps_logs_disjoint() {
    let repo = repo().await;
    let now = Utc::now();

    // Three items processed successfully, two failed.
    for (id, score) in [("a", 8.0), ("b", 9.5), ("c", 3.0)] {
        repo.record_processed(ProcessedLogEntry {
            item_id: id.to_string(),
            item_name: format!("item {id}"),
            quality_score: score,
            processed_at: now,
        })
        .await
        .unwrap();
    }
    for id in ["d", "e"] {
        repo.record_failed(FailedLogEntry {
            item_id: id.to_string(),
            item_name: format!("item {id}"),
            reason: "文件缺失: sidecar json".to_string(),
            failed_at: now,
        })
        .await
        .unwrap();
    }

    assert_mutually_exclusive(&repo, &["a", "b", "c", "d", "e"]).await;

    // Item "d" fails again, then succeeds on a later rerun, then "a" later fails.
    repo.record_failed(FailedLogEntry {
        item_id: "d".to_string(),
        item_name: "item d".to_string(),
        reason: "转码超时".to_string(),
        failed_at: now,
    })
    .await
    .unwrap();
    repo.record_processed(ProcessedLogEntry {
        item_id: "d".to_string(),
        item_name: "item d".to_string(),
        quality_score: 7.0,
        processed_at: now,
    })
    .await
    .unwrap();
    repo.record_failed(FailedLogEntry {
        item_id: "a".to_string(),
        item_name: "item a".to_string(),
        reason: "数据库错误".to_string(),
        failed_at: now,
    })
    .await
    .unwrap();

    assert_mutually_exclusive(&repo, &["a", "b", "c", "d", "e"]).await;

    let failed_now: Vec<String> = repo.find_recent_failures(100).await.unwrap().into_iter().map(|e| e.item_id).collect();
    assert!(failed_now.contains(&"a".to_string()), "a moved from processed back to failed");
    assert!(!failed_now.contains(&"d".to_string()), "d's successful reprocessing removed it from failed-log");
}
