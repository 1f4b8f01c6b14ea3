//! Reminder service: persists diary reminders and hands them to the scheduler.
//!
//! **Delivery:** the fire handler marks the row fired *before* sending, so a reminder is
//! delivered at most once even across restarts. A failed send is logged, not retried.
//!
//! **Restart:** [`ReminderService::restore_pending`] re-schedules every row still pending.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reminder_scheduler::{
    FireHandler, Job, JobHandle, LatePolicy, ReminderScheduler, ScheduleError, SchedulerConfig,
};
use storage::{ReminderRecord, ReminderRepository, StorageError};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::core::Bot;
use crate::router::messages::format_reminder;

/// What the scheduler carries for one reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPayload {
    pub reminder_id: i64,
    pub user_id: i64,
    pub chat_id: i64,
    pub task_text: String,
}

impl From<&ReminderRecord> for ReminderPayload {
    fn from(record: &ReminderRecord) -> Self {
        Self {
            reminder_id: record.id,
            user_id: record.user_id,
            chat_id: record.chat_id,
            task_text: record.task_text.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Fires a reminder: mark the row fired, then send `Reminder: <task>`.
pub struct ReminderFireHandler {
    repo: ReminderRepository,
    bot: Arc<dyn Bot>,
}

impl ReminderFireHandler {
    pub fn new(repo: ReminderRepository, bot: Arc<dyn Bot>) -> Self {
        Self { repo, bot }
    }
}

#[async_trait]
impl FireHandler<ReminderPayload> for ReminderFireHandler {
    #[instrument(skip(self, job), fields(job_id = %job.id, reminder_id = job.payload.reminder_id))]
    async fn fire(&self, job: Job<ReminderPayload>) -> anyhow::Result<()> {
        let payload = job.payload;
        if !self.repo.mark_fired(payload.reminder_id).await? {
            info!("step: reminder already fired, skipping send");
            return Ok(());
        }

        self.bot
            .send_message(payload.chat_id, &format_reminder(&payload.task_text))
            .await?;
        info!(
            user_id = payload.user_id,
            chat_id = payload.chat_id,
            target_time = %job.target_time,
            "Reminder delivered"
        );
        Ok(())
    }
}

/// Persisted reminders plus the in-memory scheduler that fires them.
pub struct ReminderService {
    repo: ReminderRepository,
    scheduler: ReminderScheduler<ReminderPayload>,
}

impl ReminderService {
    pub fn new(repo: ReminderRepository, scheduler: ReminderScheduler<ReminderPayload>) -> Self {
        Self { repo, scheduler }
    }

    /// Builds the service with the standard fire handler sending through `bot`.
    pub fn with_bot(repo: ReminderRepository, bot: Arc<dyn Bot>, config: SchedulerConfig) -> Self {
        let handler = Arc::new(ReminderFireHandler::new(repo.clone(), bot));
        Self::new(repo, ReminderScheduler::new(config, handler))
    }

    /// Persists then schedules. A reminder the scheduler refuses is removed again.
    #[instrument(skip(self, task_text))]
    pub async fn schedule(
        &self,
        user_id: i64,
        chat_id: i64,
        task_text: &str,
        target_time: DateTime<Utc>,
    ) -> Result<JobHandle, ReminderError> {
        let record = self
            .repo
            .insert(user_id, chat_id, task_text, target_time)
            .await?;

        match self.scheduler.schedule(target_time, ReminderPayload::from(&record)) {
            Ok(handle) => {
                info!(reminder_id = record.id, job_id = %handle.id, "Reminder scheduled");
                Ok(handle)
            }
            Err(e) => {
                if let Err(delete_err) = self.repo.delete(record.id).await {
                    warn!(
                        reminder_id = record.id,
                        error = %delete_err,
                        "Failed to remove unscheduled reminder"
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Re-schedules every pending row. Returns how many were scheduled.
    ///
    /// Overdue rows fire immediately regardless of the late policy.
    pub async fn restore_pending(&self) -> Result<usize, ReminderError> {
        let pending = self.repo.pending().await?;
        for record in &pending {
            self.scheduler.schedule_with_policy(
                record.target_time,
                ReminderPayload::from(record),
                LatePolicy::FireImmediately,
            )?;
        }
        let restored = pending.len();
        info!(restored, "Pending reminders restored");
        Ok(restored)
    }

    pub fn start(&self) -> Result<(), ReminderError> {
        self.scheduler.start()?;
        Ok(())
    }

    /// Stops the scheduler. Dropped jobs stay pending in storage for the next start.
    pub async fn shutdown(&self) -> usize {
        let dropped = self.scheduler.shutdown().await;
        for job in &dropped {
            info!(
                job_id = %job.id,
                reminder_id = job.payload.reminder_id,
                target_time = %job.target_time,
                "Pending reminder left for next start"
            );
        }
        dropped.len()
    }

    pub fn pending_count(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn repository(&self) -> &ReminderRepository {
        &self.repo
    }
}
