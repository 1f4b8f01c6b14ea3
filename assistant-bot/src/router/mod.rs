//! # Dialogue router
//!
//! Turns one [`InboundEvent`] plus the user's [`Mode`] into a [`RouteOutcome`], updating
//! session state, reminders and history on the way.
//!
//! | Mode | Event | Result |
//! |------|-------|--------|
//! | any | `Start` | typing, then menu; mode unchanged |
//! | any | menu: diary | diary prompt, `AwaitingTask` |
//! | any | menu: category | entry text, `Category(c)` |
//! | `Idle` | text | "select a category first" + menu |
//! | `AwaitingTask` | valid task line | reminder scheduled, confirmation, `Idle` |
//! | `AwaitingTask` | invalid line / schedule refused | error text, still `AwaitingTask` |
//! | `Category(c)` | text | model answer with `(user, c)` history, appended to history |
//!
//! Every recoverable failure ends as a reply; nothing here returns an error.

pub mod messages;

use std::sync::Arc;
use std::time::Duration;

use llm_client::{complete_with_timeout, LlmClient};
use prompt::{format_context_block, ContextLimits, ModelRequest};
use storage::{HistoryStore, InteractionRecord, QaPair};
use tracing::{error, info, instrument, warn};

use crate::core::{Bot, Category, InboundEvent, MenuItem, OutboundAction, RouteOutcome};
use crate::reminders::{ReminderError, ReminderService};
use crate::session::{Mode, SessionState};
use crate::task_parser::parse_task_line;

use messages::*;

/// Tunables for routing.
#[derive(Debug, Clone, Copy)]
pub struct RouterSettings {
    /// Subtracted from the task time to get the reminder time.
    pub reminder_lead: chrono::Duration,
    pub context_limits: ContextLimits,
    pub llm_timeout: Duration,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            reminder_lead: chrono::Duration::minutes(30),
            context_limits: ContextLimits::default(),
            llm_timeout: Duration::from_secs(60),
        }
    }
}

pub struct DialogueRouter {
    sessions: Arc<SessionState>,
    history: Arc<dyn HistoryStore>,
    llm: Arc<dyn LlmClient>,
    reminders: Arc<ReminderService>,
    bot: Arc<dyn Bot>,
    settings: RouterSettings,
}

impl DialogueRouter {
    pub fn new(
        sessions: Arc<SessionState>,
        history: Arc<dyn HistoryStore>,
        llm: Arc<dyn LlmClient>,
        reminders: Arc<ReminderService>,
        bot: Arc<dyn Bot>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            sessions,
            history,
            llm,
            reminders,
            bot,
            settings,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionState> {
        &self.sessions
    }

    /// Handles one event. Callers must not route two events of the same user concurrently.
    #[instrument(skip(self, event), fields(user_id = event.user_id(), kind = event.kind()))]
    pub async fn route(&self, event: &InboundEvent) -> RouteOutcome {
        self.sessions.touch(event.user_id());
        match event {
            InboundEvent::Start { chat_id, .. } => {
                if let Err(e) = self.bot.send_typing(*chat_id).await {
                    warn!(error = %e, "Failed to send typing indicator");
                }
                RouteOutcome::menu(*chat_id, MSG_CHOOSE_CATEGORY)
            }
            InboundEvent::MenuSelection {
                user_id,
                chat_id,
                item,
            } => self.on_menu_selection(*user_id, *chat_id, *item),
            InboundEvent::TextMessage {
                user_id,
                chat_id,
                text,
            } => match self.sessions.get_mode(*user_id) {
                Mode::Idle => {
                    info!("step: free text without a category");
                    RouteOutcome::menu(*chat_id, MSG_SELECT_CATEGORY_FIRST)
                }
                Mode::AwaitingTask => self.on_task_line(*user_id, *chat_id, text).await,
                Mode::Category(category) => {
                    self.on_question(*user_id, *chat_id, category, text).await
                }
            },
        }
    }

    fn on_menu_selection(&self, user_id: i64, chat_id: i64, item: MenuItem) -> RouteOutcome {
        match item.category() {
            Some(category) => {
                self.sessions.set_mode(user_id, Mode::Category(category));
                RouteOutcome::text(chat_id, category_entry_text(category))
            }
            None => {
                self.sessions.set_mode(user_id, Mode::AwaitingTask);
                RouteOutcome::text(chat_id, MSG_DIARY_PROMPT)
            }
        }
    }

    async fn on_task_line(&self, user_id: i64, chat_id: i64, text: &str) -> RouteOutcome {
        let task = match parse_task_line(text) {
            Ok(task) => task,
            Err(e) => {
                info!(error = %e, "step: task line rejected");
                return RouteOutcome::text(chat_id, format_task_parse_error(&e));
            }
        };

        let Some(target_time) = task.due.checked_sub_signed(self.settings.reminder_lead) else {
            info!(due = %task.due, "step: reminder time out of range");
            return RouteOutcome::text(chat_id, format_task_parse_error(&MSG_TIME_OUT_OF_RANGE));
        };
        match self
            .reminders
            .schedule(user_id, chat_id, &task.task_text, target_time)
            .await
        {
            Ok(handle) => {
                self.sessions.set_mode(user_id, Mode::Idle);
                info!(job_id = %handle.id, target_time = %target_time, "step: task added");
                RouteOutcome::new()
                    .with(OutboundAction::ScheduleReminder {
                        user_id,
                        task_text: task.task_text.clone(),
                        target_time,
                        job_id: handle.id,
                    })
                    .with(OutboundAction::SendText {
                        chat_id,
                        text: format_task_added(&task.task_text, target_time),
                    })
            }
            Err(ReminderError::Schedule(e)) => {
                info!(error = %e, "step: reminder refused by scheduler");
                RouteOutcome::text(chat_id, format_schedule_error(&e))
            }
            Err(ReminderError::Storage(e)) => {
                error!(error = %e, "Failed to persist reminder");
                RouteOutcome::text(chat_id, MSG_TASK_NOT_SAVED)
            }
        }
    }

    async fn on_question(
        &self,
        user_id: i64,
        chat_id: i64,
        category: Category,
        question: &str,
    ) -> RouteOutcome {
        let pairs = self.load_history(user_id, category).await;
        let context = format_context_block(
            pairs.iter().map(|p| (p.question.as_str(), p.answer.as_str())),
            self.settings.context_limits,
        );
        let request = ModelRequest::new(system_role(category), context, question);

        if let Err(e) = self.bot.send_typing(chat_id).await {
            warn!(error = %e, "Failed to send typing indicator");
        }

        info!(
            category = %category,
            history_pairs = pairs.len(),
            question_len = question.len(),
            "step: delegating to model"
        );
        let answer =
            match complete_with_timeout(self.llm.as_ref(), &request, self.settings.llm_timeout).await {
                Ok(answer) => answer,
                Err(e) => {
                    error!(error = %e, category = %category, "Model delegation failed");
                    return RouteOutcome::text(chat_id, MSG_MODEL_FAILED);
                }
            };

        self.record_exchange(InteractionRecord::new(
            user_id,
            category.as_str(),
            question,
            answer.as_str(),
        ))
        .await;
        RouteOutcome::text(chat_id, answer)
    }

    /// History for the prompt. A read failure degrades to no history.
    async fn load_history(&self, user_id: i64, category: Category) -> Vec<QaPair> {
        match self
            .history
            .query_recent(user_id, category.as_str(), self.settings.context_limits.max_pairs)
            .await
        {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(error = %e, "History read failed; answering without context");
                Vec::new()
            }
        }
    }

    /// Appends with one retry; a second failure is logged and the answer still goes out.
    async fn record_exchange(&self, record: InteractionRecord) {
        if let Err(first) = self.history.append(&record).await {
            warn!(error = %first, "History append failed; retrying once");
            if let Err(second) = self.history.append(&record).await {
                error!(
                    error = %second,
                    user_id = record.user_id,
                    category = %record.category,
                    "Answered but not recorded"
                );
            }
        }
    }
}
