//! Interaction record model for persistence.
//!
//! Maps to the `interactions` table and is used by InteractionRepository.

use chrono::{DateTime, Utc};

/// One model-delegated exchange. Immutable once written.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct InteractionRecord {
    /// Insertion order; 0 until the record is appended.
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub user_message: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Creates an unsaved record stamped with the current time.
    pub fn new(
        user_id: i64,
        category: impl Into<String>,
        user_message: impl Into<String>,
        bot_response: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            category: category.into(),
            user_message: user_message.into(),
            bot_response: bot_response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A prior question and the answer the bot gave to it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}
