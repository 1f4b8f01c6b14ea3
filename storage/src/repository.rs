//! History store abstraction used by the dialogue layer.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{InteractionRecord, QaPair};

/// Append-only log of (user, category, question, answer) exchanges.
///
/// Reads issued after `append` returns observe the new record.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stores the record and returns it as persisted (assigned id, final timestamp).
    async fn append(&self, record: &InteractionRecord) -> Result<InteractionRecord, StorageError>;

    /// All pairs for `(user_id, category)` in insertion order; empty when none exist.
    async fn query(&self, user_id: i64, category: &str) -> Result<Vec<QaPair>, StorageError>;

    /// The last `limit` pairs for `(user_id, category)`, still oldest first.
    async fn query_recent(
        &self,
        user_id: i64,
        category: &str,
        limit: usize,
    ) -> Result<Vec<QaPair>, StorageError>;
}
