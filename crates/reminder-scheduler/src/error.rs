use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("target time {target_time} is already in the past (now {now})")]
    InPast {
        target_time: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("scheduler has been shut down")]
    ShutDown,

    #[error("scheduler is already running")]
    AlreadyRunning,
}
