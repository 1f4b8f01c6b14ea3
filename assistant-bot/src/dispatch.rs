//! Per-user serialization of inbound events.
//!
//! Each user gets an unbounded queue and one worker task; the worker routes events strictly in
//! arrival order and executes the resulting actions before taking the next event. Different
//! users are processed concurrently. A worker that sees no events for its idle timeout removes
//! its queue; the next event for that user starts a fresh one.
//!
//! **Data flow:** transport → [`UserDispatcher::dispatch`] → per-user queue →
//! `process_queue_loop` → [`DialogueRouter::route`] → [`execute_outcome`].

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::core::{Bot, DbotError, InboundEvent, MenuItem, OutboundAction, Result, RouteOutcome};
use crate::router::DialogueRouter;

/// How long a user's worker waits for the next event before releasing its queue.
pub const DEFAULT_QUEUE_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

type QueueSender = mpsc::UnboundedSender<InboundEvent>;
type QueueMap = Arc<DashMap<i64, QueueSender>>;

pub struct UserDispatcher {
    router: Arc<DialogueRouter>,
    bot: Arc<dyn Bot>,
    queues: QueueMap,
    idle_timeout: Duration,
}

impl UserDispatcher {
    pub fn new(router: Arc<DialogueRouter>, bot: Arc<dyn Bot>) -> Self {
        Self::with_idle_timeout(router, bot, DEFAULT_QUEUE_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(
        router: Arc<DialogueRouter>,
        bot: Arc<dyn Bot>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            router,
            bot,
            queues: Arc::new(DashMap::new()),
            idle_timeout,
        }
    }

    /// Enqueues the event on its user's queue, starting the worker on first use.
    ///
    /// The send happens while the map entry is held, so an idle worker can only release its
    /// queue when nothing is in flight for that user.
    pub fn dispatch(&self, event: InboundEvent) -> Result<()> {
        let user_id = event.user_id();
        let mut tx = self
            .queues
            .entry(user_id)
            .or_insert_with(|| self.spawn_queue(user_id));

        match tx.send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::SendError(event)) => {
                warn!(user_id, "Queue worker gone; restarting");
                *tx = self.spawn_queue(user_id);
                tx.send(event).map_err(|_| DbotError::QueueClosed(user_id))
            }
        }
    }

    /// Number of users with a live queue.
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    fn spawn_queue(&self, user_id: i64) -> QueueSender {
        let (tx, rx) = mpsc::unbounded_channel::<InboundEvent>();
        tokio::spawn(Self::process_queue_loop(
            rx,
            Arc::clone(&self.router),
            Arc::clone(&self.bot),
            Arc::clone(&self.queues),
            self.idle_timeout,
            user_id,
        ));
        debug!(user_id, "Started user queue");
        tx
    }

    async fn process_queue_loop(
        mut rx: mpsc::UnboundedReceiver<InboundEvent>,
        router: Arc<DialogueRouter>,
        bot: Arc<dyn Bot>,
        queues: QueueMap,
        idle_timeout: Duration,
        user_id: i64,
    ) {
        loop {
            match tokio::time::timeout(idle_timeout, rx.recv()).await {
                Ok(Some(event)) => {
                    info!(user_id, kind = event.kind(), "Processing queued event");
                    let outcome = router.route(&event).await;
                    execute_outcome(bot.as_ref(), &outcome).await;
                }
                Ok(None) => break,
                Err(_) => {
                    // Holding the shard lock: no dispatch can send between the check and removal.
                    if queues.remove_if(&user_id, |_, _| rx.is_empty()).is_some() {
                        debug!(user_id, "User queue idle; released");
                        return;
                    }
                }
            }
        }
        debug!(user_id, "User queue closed");
    }
}

/// Sends every `SendText`/`ShowMenu` action in order. Send failures are logged and skipped.
pub async fn execute_outcome(bot: &dyn Bot, outcome: &RouteOutcome) {
    for action in &outcome.actions {
        let sent = match action {
            OutboundAction::SendText { chat_id, text } => bot.send_message(*chat_id, text).await,
            OutboundAction::ShowMenu { chat_id, text } => {
                bot.send_menu(*chat_id, text, &MenuItem::ALL).await
            }
            OutboundAction::ScheduleReminder {
                user_id,
                target_time,
                job_id,
                ..
            } => {
                debug!(user_id, job_id = %job_id, target_time = %target_time, "Reminder registered");
                Ok(())
            }
        };
        if let Err(e) = sent {
            error!(error = %e, "Failed to send reply");
        }
    }
}
