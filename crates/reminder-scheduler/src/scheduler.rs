//! Background firing loop and the scheduler handle that owns it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BinaryHeap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::job::{Job, JobHandle, JobId};

/// Default polling granularity.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Callback invoked once per fired job.
#[async_trait]
pub trait FireHandler<P: Send + 'static>: Send + Sync {
    async fn fire(&self, job: Job<P>) -> anyhow::Result<()>;
}

/// What `schedule` does with a target time that has already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatePolicy {
    /// Accept the job; it fires on the next loop iteration.
    #[default]
    FireImmediately,
    /// Refuse with [`ScheduleError::InPast`].
    Reject,
}

impl FromStr for LatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" | "fire_immediately" => Ok(Self::FireImmediately),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown late policy '{}', expected 'fire' or 'reject'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Upper bound on how long the loop sleeps between checks.
    pub poll_interval: Duration,
    pub late_policy: LatePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            late_policy: LatePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    ShutDown,
}

struct Queue<P> {
    heap: BinaryHeap<Job<P>>,
    next_id: u64,
    state: Lifecycle,
}

struct Shared<P: Send + 'static> {
    queue: Mutex<Queue<P>>,
    wake: Notify,
    handler: Arc<dyn FireHandler<P>>,
    config: SchedulerConfig,
}

impl<P: Send + 'static> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, Queue<P>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pops the earliest job if it is due and the scheduler is still running.
    fn pop_due(&self, now: DateTime<Utc>) -> Option<Job<P>> {
        let mut queue = self.lock();
        if queue.state != Lifecycle::Running {
            return None;
        }
        match queue.heap.peek() {
            Some(job) if job.target_time <= now => queue.heap.pop(),
            _ => None,
        }
    }

    fn next_delay(&self, now: DateTime<Utc>) -> Duration {
        let queue = self.lock();
        match queue.heap.peek() {
            Some(job) => (job.target_time - now)
                .to_std()
                .unwrap_or(Duration::ZERO)
                .min(self.config.poll_interval),
            None => self.config.poll_interval,
        }
    }

    async fn fire(&self, job: Job<P>) {
        let handle = job.handle();
        let lateness_ms = (Utc::now() - handle.target_time).num_milliseconds();
        debug!(job_id = %handle.id, lateness_ms, "step: firing job");
        if let Err(e) = self.handler.fire(job).await {
            warn!(
                job_id = %handle.id,
                target_time = %handle.target_time,
                error = %e,
                "Job callback failed; not retrying"
            );
        }
    }
}

async fn run_loop<P: Send + 'static>(shared: Arc<Shared<P>>, mut shutdown_rx: watch::Receiver<bool>) {
    loop {
        while let Some(job) = shared.pop_due(Utc::now()) {
            shared.fire(job).await;
            if *shutdown_rx.borrow() {
                debug!("Reminder scheduler loop stopped");
                return;
            }
        }

        let delay = shared.next_delay(Utc::now());
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shared.wake.notified() => {}
            _ = shutdown_rx.changed() => break,
        }
        if *shutdown_rx.borrow() {
            break;
        }
    }
    debug!("Reminder scheduler loop stopped");
}

/// Ordered set of pending jobs plus the task that fires them.
pub struct ReminderScheduler<P: Send + 'static> {
    shared: Arc<Shared<P>>,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<P: Send + 'static> ReminderScheduler<P> {
    pub fn new(config: SchedulerConfig, handler: Arc<dyn FireHandler<P>>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    heap: BinaryHeap::new(),
                    next_id: 1,
                    state: Lifecycle::Created,
                }),
                wake: Notify::new(),
                handler,
                config,
            }),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.shared.config
    }

    /// Spawns the firing loop. Must be called inside a tokio runtime.
    pub fn start(&self) -> Result<(), ScheduleError> {
        let pending = {
            let mut queue = self.shared.lock();
            match queue.state {
                Lifecycle::Running => return Err(ScheduleError::AlreadyRunning),
                Lifecycle::ShutDown => return Err(ScheduleError::ShutDown),
                Lifecycle::Created => queue.state = Lifecycle::Running,
            }
            queue.heap.len()
        };

        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.shared),
            self.shutdown_tx.subscribe(),
        ));
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        info!(
            pending,
            poll_interval_ms = self.shared.config.poll_interval.as_millis() as u64,
            late_policy = ?self.shared.config.late_policy,
            "Reminder scheduler started"
        );
        Ok(())
    }

    /// Adds a job. Identical jobs are never merged; each call yields its own firing.
    pub fn schedule(
        &self,
        target_time: DateTime<Utc>,
        payload: P,
    ) -> Result<JobHandle, ScheduleError> {
        self.schedule_with_policy(target_time, payload, self.shared.config.late_policy)
    }

    /// Like [`schedule`](Self::schedule) but overrides the configured late policy for this job.
    pub fn schedule_with_policy(
        &self,
        target_time: DateTime<Utc>,
        payload: P,
        late_policy: LatePolicy,
    ) -> Result<JobHandle, ScheduleError> {
        let now = Utc::now();
        let handle = {
            let mut queue = self.shared.lock();
            if queue.state == Lifecycle::ShutDown {
                return Err(ScheduleError::ShutDown);
            }
            if target_time < now && late_policy == LatePolicy::Reject {
                return Err(ScheduleError::InPast { target_time, now });
            }
            let id = JobId(queue.next_id);
            queue.next_id += 1;
            let job = Job {
                id,
                target_time,
                payload,
            };
            let handle = job.handle();
            queue.heap.push(job);
            handle
        };
        self.shared.wake.notify_one();

        debug!(
            job_id = %handle.id,
            target_time = %handle.target_time,
            late = target_time < now,
            "Job scheduled"
        );
        Ok(handle)
    }

    /// Removes a pending job. Returns false if it already fired or never existed.
    pub fn cancel(&self, id: JobId) -> bool {
        let mut queue = self.shared.lock();
        let before = queue.heap.len();
        queue.heap.retain(|job| job.id != id);
        let removed = queue.heap.len() < before;
        if removed {
            debug!(job_id = %id, "Job cancelled");
        }
        removed
    }

    pub fn pending_count(&self) -> usize {
        self.shared.lock().heap.len()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().state == Lifecycle::Running
    }

    /// Stops the loop, waits for an in-flight callback, and returns the dropped jobs in fire
    /// order. Later `schedule` and `start` calls fail with [`ScheduleError::ShutDown`].
    pub async fn shutdown(&self) -> Vec<Job<P>> {
        self.shared.lock().state = Lifecycle::ShutDown;
        self.shutdown_tx.send_replace(true);
        self.shared.wake.notify_one();

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Reminder scheduler task ended abnormally");
            }
        }

        let mut queue = self.shared.lock();
        let mut dropped = Vec::with_capacity(queue.heap.len());
        while let Some(job) = queue.heap.pop() {
            dropped.push(job);
        }
        info!(dropped = dropped.len(), "Reminder scheduler shut down");
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl FireHandler<u32> for Noop {
        async fn fire(&self, _job: Job<u32>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_late_policy_from_str() {
        assert_eq!("fire".parse::<LatePolicy>(), Ok(LatePolicy::FireImmediately));
        assert_eq!(" Reject ".parse::<LatePolicy>(), Ok(LatePolicy::Reject));
        assert!("drop".parse::<LatePolicy>().is_err());
    }

    #[test]
    fn test_next_delay_is_capped_by_poll_interval() {
        let scheduler: ReminderScheduler<u32> =
            ReminderScheduler::new(SchedulerConfig::default(), Arc::new(Noop));
        let now = Utc::now();
        assert_eq!(scheduler.shared.next_delay(now), Duration::from_millis(1000));

        scheduler
            .schedule(now + chrono::Duration::hours(1), 1)
            .unwrap();
        assert_eq!(scheduler.shared.next_delay(now), Duration::from_millis(1000));

        scheduler
            .schedule(now - chrono::Duration::seconds(5), 2)
            .unwrap();
        assert_eq!(scheduler.shared.next_delay(now), Duration::ZERO);
    }

    #[test]
    fn test_pop_due_requires_running() {
        let scheduler: ReminderScheduler<u32> =
            ReminderScheduler::new(SchedulerConfig::default(), Arc::new(Noop));
        let now = Utc::now();
        scheduler
            .schedule(now - chrono::Duration::seconds(1), 1)
            .unwrap();
        assert!(scheduler.shared.pop_due(now).is_none());
        scheduler.shared.lock().state = Lifecycle::Running;
        assert_eq!(scheduler.shared.pop_due(now).map(|j| j.payload), Some(1));
    }
}
