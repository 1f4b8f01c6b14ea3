//! # Reminder scheduler
//!
//! Holds pending timed jobs ordered by `(target_time, insertion order)` and fires each one
//! exactly once from a background task.
//!
//! - **Granularity**: the loop sleeps until the next target time, capped by
//!   [`SchedulerConfig::poll_interval`]; scheduling a job wakes it early. Worst-case lateness is
//!   one poll interval plus the time spent in earlier callbacks.
//! - **Late jobs**: see [`LatePolicy`].
//! - **Shutdown**: [`ReminderScheduler::shutdown`] waits for an in-flight callback, then drops
//!   the remaining jobs and hands them back in fire order.
//! - **Failures**: a callback error is logged; the job still counts as fired.

mod error;
mod job;
mod scheduler;

pub use error::ScheduleError;
pub use job::{Job, JobHandle, JobId};
pub use scheduler::{FireHandler, LatePolicy, ReminderScheduler, SchedulerConfig};
