//! Reminder repository: persisted reminders so pending ones survive a restart.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::models::ReminderRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ReminderRepository {
    pool_manager: SqlitePoolManager,
}

impl ReminderRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        run_migrations(pool_manager.pool()).await?;
        Ok(Self { pool_manager })
    }

    /// Inserts a pending reminder and returns it with its id.
    #[instrument(skip(self, task_text))]
    pub async fn insert(
        &self,
        user_id: i64,
        chat_id: i64,
        task_text: &str,
        target_time: DateTime<Utc>,
    ) -> Result<ReminderRecord, StorageError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO reminders (user_id, chat_id, task_text, target_time, created_at, fired_at)
            VALUES (?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(task_text)
        .bind(target_time)
        .bind(created_at)
        .execute(self.pool_manager.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!(id, user_id, target_time = %target_time, "Saved reminder");
        Ok(ReminderRecord {
            id,
            user_id,
            chat_id,
            task_text: task_text.to_string(),
            target_time,
            created_at,
            fired_at: None,
        })
    }

    /// Marks the reminder fired. Returns false if it was already fired or does not exist.
    pub async fn mark_fired(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE reminders SET fired_at = ? WHERE id = ? AND fired_at IS NULL")
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Removes a reminder that was never handed to the scheduler.
    pub async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Pending reminders ordered by target time, then insertion.
    pub async fn pending(&self) -> Result<Vec<ReminderRecord>, StorageError> {
        let records = sqlx::query_as::<_, ReminderRecord>(
            "SELECT * FROM reminders WHERE fired_at IS NULL ORDER BY target_time ASC, id ASC",
        )
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Option<ReminderRecord>, StorageError> {
        let record = sqlx::query_as::<_, ReminderRecord>("SELECT * FROM reminders WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_insert_then_pending() {
        let repo = ReminderRepository::new("sqlite::memory:").await.unwrap();
        let target = Utc::now() + Duration::hours(1);
        let saved = repo.insert(7, 7, "Buy milk", target).await.unwrap();

        let pending = repo.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, saved.id);
        assert_eq!(pending[0].task_text, "Buy milk");
        assert!(pending[0].is_pending());
    }

    #[tokio::test]
    async fn test_mark_fired_only_once() {
        let repo = ReminderRepository::new("sqlite::memory:").await.unwrap();
        let saved = repo.insert(1, 1, "Call mom", Utc::now()).await.unwrap();

        assert!(repo.mark_fired(saved.id).await.unwrap());
        assert!(!repo.mark_fired(saved.id).await.unwrap());
        assert!(repo.pending().await.unwrap().is_empty());
        let fired = repo.get(saved.id).await.unwrap().unwrap();
        assert!(fired.fired_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let repo = ReminderRepository::new("sqlite::memory:").await.unwrap();
        let saved = repo.insert(1, 1, "Oops", Utc::now()).await.unwrap();

        assert!(repo.delete(saved.id).await.unwrap());
        assert!(!repo.delete(saved.id).await.unwrap());
        assert!(repo.get(saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pending_ordered_by_target_time() {
        let repo = ReminderRepository::new("sqlite::memory:").await.unwrap();
        let now = Utc::now();
        repo.insert(1, 1, "later", now + Duration::hours(2)).await.unwrap();
        repo.insert(1, 1, "sooner", now + Duration::hours(1)).await.unwrap();

        let pending = repo.pending().await.unwrap();
        let texts: Vec<&str> = pending.iter().map(|r| r.task_text.as_str()).collect();
        assert_eq!(texts, vec!["sooner", "later"]);
    }
}
