//! In-memory [`storage::HistoryStore`] whose reads or appends can be made to fail.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use storage::{HistoryStore, InteractionRecord, QaPair, StorageError};

pub struct FlakyHistory {
    records: Mutex<Vec<InteractionRecord>>,
    /// Appends still to fail before one succeeds.
    append_failures: AtomicUsize,
    append_calls: AtomicUsize,
    fail_reads: bool,
}

impl FlakyHistory {
    /// Fails the next `n` appends; `usize::MAX` fails them all.
    pub fn with_append_failures(n: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            append_failures: AtomicUsize::new(n),
            append_calls: AtomicUsize::new(0),
            fail_reads: false,
        }
    }

    /// Every read fails; appends succeed.
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::with_append_failures(0)
        }
    }

    pub fn seed(&self, record: InteractionRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<InteractionRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    fn io_error() -> StorageError {
        StorageError::Database(sqlx::Error::PoolTimedOut)
    }

    fn pairs(&self, user_id: i64, category: &str) -> Vec<QaPair> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.category == category)
            .map(|r| QaPair {
                question: r.user_message.clone(),
                answer: r.bot_response.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl HistoryStore for FlakyHistory {
    async fn append(&self, record: &InteractionRecord) -> Result<InteractionRecord, StorageError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .append_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok();
        if failed {
            return Err(Self::io_error());
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(record.clone())
    }

    async fn query(&self, user_id: i64, category: &str) -> Result<Vec<QaPair>, StorageError> {
        if self.fail_reads {
            return Err(Self::io_error());
        }
        Ok(self.pairs(user_id, category))
    }

    async fn query_recent(
        &self,
        user_id: i64,
        category: &str,
        limit: usize,
    ) -> Result<Vec<QaPair>, StorageError> {
        let pairs = self.query(user_id, category).await?;
        let skip = pairs.len().saturating_sub(limit);
        Ok(pairs.into_iter().skip(skip).collect())
    }
}
