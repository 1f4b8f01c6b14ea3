//! Persisted reminder row.
//!
//! Maps to the `reminders` table; `fired_at` is NULL while the reminder is pending.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ReminderRecord {
    pub id: i64,
    pub user_id: i64,
    pub chat_id: i64,
    pub task_text: String,
    pub target_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub fired_at: Option<DateTime<Utc>>,
}

impl ReminderRecord {
    pub fn is_pending(&self) -> bool {
        self.fired_at.is_none()
    }
}
