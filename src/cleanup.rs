//! Scheduled cleanup of cart entries left behind by deleted foods.

use crate::db::Database;
use std::time::Duration;
use tracing::{error, info};

/// Interval between cleanup runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60); // 1 hour

/// Run all cleanup tasks once.
pub async fn run_cleanup(db: &Database) {
    match db.cart().cleanup_orphaned().await {
        Ok(count) if count > 0 => info!("Cleaned up {} orphaned cart entries", count),
        Ok(_) => {}
        Err(e) => error!("Failed to clean up orphaned cart entries: {}", e),
    }
}

/// Spawn a background task that runs cleanup periodically.
/// Returns a handle that can be used to abort the task.
pub fn spawn_cleanup_scheduler(db: Database) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        // The first tick completes immediately; startup already ran a pass
        interval.tick().await;

        loop {
            interval.tick().await;
            run_cleanup(&db).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewCartEntry;

    #[tokio::test]
    async fn test_run_cleanup_removes_orphans() {
        let db = Database::open(":memory:").await.unwrap();
        db.cart()
            .insert(&NewCartEntry {
                email: "bob@example.com".to_string(),
                food_id: "no-such-food".to_string(),
                quantity: 1,
                added_at: None,
            })
            .await
            .unwrap();

        run_cleanup(&db).await;

        assert!(
            db.cart()
                .list_by_email("bob@example.com")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
