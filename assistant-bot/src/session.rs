//! Per-user session state: which mode the next free-text message is interpreted in.
//!
//! One entry per user in a [`DashMap`]; a user with no entry is [`Mode::Idle`]. Entries carry a
//! last-touched instant so idle sessions can be swept.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::core::Category;

/// The single active mode of a user. `active_category` is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No category and no task entry.
    #[default]
    Idle,
    /// Free text is a question in this category.
    Category(Category),
    /// Next free text is a `task | datetime` line.
    AwaitingTask,
}

impl Mode {
    pub fn active_category(&self) -> Option<Category> {
        match self {
            Mode::Category(category) => Some(*category),
            Mode::Idle | Mode::AwaitingTask => None,
        }
    }

    pub fn is_awaiting_task(&self) -> bool {
        matches!(self, Mode::AwaitingTask)
    }
}

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    mode: Mode,
    touched: Instant,
}

/// Session store keyed by user id.
#[derive(Debug, Default)]
pub struct SessionState {
    entries: DashMap<i64, SessionEntry>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode; `Idle` for users never seen (or evicted).
    pub fn get_mode(&self, user_id: i64) -> Mode {
        self.entries
            .get(&user_id)
            .map(|entry| entry.mode)
            .unwrap_or_default()
    }

    /// Replaces the user's mode.
    pub fn set_mode(&self, user_id: i64, mode: Mode) {
        let previous = self.entries.insert(
            user_id,
            SessionEntry {
                mode,
                touched: Instant::now(),
            },
        );
        debug!(
            user_id,
            from = ?previous.map(|entry| entry.mode).unwrap_or_default(),
            to = ?mode,
            "Session mode changed"
        );
    }

    /// Marks the session as used without changing its mode.
    pub fn touch(&self, user_id: i64) {
        if let Some(mut entry) = self.entries.get_mut(&user_id) {
            entry.touched = Instant::now();
        }
    }

    pub fn clear(&self, user_id: i64) {
        self.entries.remove(&user_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops sessions untouched for at least `ttl`. Returns how many were removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        self.evict_idle_at(Instant::now(), ttl)
    }

    fn evict_idle_at(&self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.touched) < ttl);
        before.saturating_sub(self.entries.len())
    }
}
