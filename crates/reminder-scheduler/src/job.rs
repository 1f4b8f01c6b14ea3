use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

/// Identifier assigned at scheduling time; increases with insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Returned by `schedule`; enough to cancel or log the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobHandle {
    pub id: JobId,
    pub target_time: DateTime<Utc>,
}

/// A pending or fired job. `target_time` never changes after creation.
#[derive(Debug, Clone)]
pub struct Job<P> {
    pub id: JobId,
    pub target_time: DateTime<Utc>,
    pub payload: P,
}

impl<P> Job<P> {
    pub fn handle(&self) -> JobHandle {
        JobHandle {
            id: self.id,
            target_time: self.target_time,
        }
    }

    fn key(&self) -> (DateTime<Utc>, JobId) {
        (self.target_time, self.id)
    }
}

// Ordering is by fire order only; payloads are not compared.
impl<P> PartialEq for Job<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<P> Eq for Job<P> {}

impl<P> PartialOrd for Job<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Job<P> {
    /// Reversed so that `BinaryHeap` pops the earliest `(target_time, id)` first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}
