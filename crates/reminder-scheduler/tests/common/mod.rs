//! Shared test helpers: a [`FireHandler`] that records every fired job.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reminder_scheduler::{FireHandler, Job, JobId};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Fired {
    pub id: JobId,
    pub payload: String,
    pub target_time: DateTime<Utc>,
    pub fired_at: DateTime<Utc>,
}

/// Records fired jobs; optionally fails every call or sleeps before returning.
#[derive(Default)]
pub struct RecordingHandler {
    pub fired: Arc<Mutex<Vec<Fired>>>,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fired(&self) -> Vec<Fired> {
        self.fired.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.fired().into_iter().map(|f| f.payload).collect()
    }
}

#[async_trait]
impl FireHandler<String> for RecordingHandler {
    async fn fire(&self, job: Job<String>) -> anyhow::Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.fired.lock().unwrap().push(Fired {
            id: job.id,
            payload: job.payload,
            target_time: job.target_time,
            fired_at: Utc::now(),
        });
        if self.fail {
            anyhow::bail!("send failed");
        }
        Ok(())
    }
}

/// Polls `cond` every 10ms until it holds or `timeout` elapses.
pub async fn wait_until<F: Fn() -> bool>(cond: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
