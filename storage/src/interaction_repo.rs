//! Interaction repository: SQLite-backed history store.
//!
//! Uses SqlitePoolManager and InteractionRecord. Appends are serialized through a single writer
//! lock and a transaction, so a record is either fully visible or not at all.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::models::{InteractionRecord, QaPair};
use crate::repository::HistoryStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct InteractionRepository {
    pool_manager: SqlitePoolManager,
    write_lock: Arc<Mutex<()>>,
}

impl InteractionRepository {
    /// Opens the database and applies pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    /// Builds a repository on an existing pool (shared with [`crate::ReminderRepository`]).
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        run_migrations(pool_manager.pool()).await?;
        Ok(Self {
            pool_manager,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Full records for a user and category, in insertion order.
    pub async fn get_records(
        &self,
        user_id: i64,
        category: &str,
    ) -> Result<Vec<InteractionRecord>, StorageError> {
        let records = sqlx::query_as::<_, InteractionRecord>(
            r#"
            SELECT rowid AS id, user_id, category, user_message, bot_response, timestamp
            FROM interactions
            WHERE user_id = ? AND category = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(user_id)
        .bind(category)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(records)
    }

    pub async fn count_for_user(&self, user_id: i64) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interactions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl HistoryStore for InteractionRepository {
    #[instrument(skip(self, record), fields(user_id = record.user_id, category = %record.category))]
    async fn append(&self, record: &InteractionRecord) -> Result<InteractionRecord, StorageError> {
        let _writer = self.write_lock.lock().await;
        let mut tx = self.pool_manager.pool().begin().await?;

        // A clock that stepped backwards must not reorder this user's history.
        let last: Option<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT timestamp FROM interactions WHERE user_id = ? ORDER BY rowid DESC LIMIT 1",
        )
        .bind(record.user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let timestamp = match last {
            Some((previous,)) if previous > record.timestamp => previous,
            _ => record.timestamp,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO interactions (user_id, category, user_message, bot_response, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.user_id)
        .bind(&record.category)
        .bind(&record.user_message)
        .bind(&record.bot_response)
        .bind(timestamp)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        let stored = InteractionRecord {
            id: result.last_insert_rowid(),
            timestamp,
            ..record.clone()
        };
        info!(id = stored.id, "Saved interaction");
        Ok(stored)
    }

    async fn query(&self, user_id: i64, category: &str) -> Result<Vec<QaPair>, StorageError> {
        let pairs = sqlx::query_as::<_, QaPair>(
            r#"
            SELECT user_message AS question, bot_response AS answer
            FROM interactions
            WHERE user_id = ? AND category = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(user_id)
        .bind(category)
        .fetch_all(self.pool_manager.pool())
        .await?;
        debug!(user_id, category, count = pairs.len(), "Retrieved history");
        Ok(pairs)
    }

    async fn query_recent(
        &self,
        user_id: i64,
        category: &str,
        limit: usize,
    ) -> Result<Vec<QaPair>, StorageError> {
        let mut pairs = sqlx::query_as::<_, QaPair>(
            r#"
            SELECT user_message AS question, bot_response AS answer
            FROM interactions
            WHERE user_id = ? AND category = ?
            ORDER BY rowid DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool_manager.pool())
        .await?;
        pairs.reverse();
        debug!(user_id, category, count = pairs.len(), limit, "Retrieved recent history");
        Ok(pairs)
    }
}
