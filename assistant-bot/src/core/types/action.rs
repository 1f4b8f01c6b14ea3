use chrono::{DateTime, Utc};
use reminder_scheduler::JobId;

/// One effect produced by the router.
///
/// `SendText` and `ShowMenu` are executed by the transport. `ScheduleReminder` reports a
/// registration the router already made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    SendText {
        chat_id: i64,
        text: String,
    },
    ShowMenu {
        chat_id: i64,
        text: String,
    },
    ScheduleReminder {
        user_id: i64,
        task_text: String,
        target_time: DateTime<Utc>,
        job_id: JobId,
    },
}

/// Everything the router decided for one inbound event, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOutcome {
    pub actions: Vec<OutboundAction>,
}

impl RouteOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self::new().with(OutboundAction::SendText {
            chat_id,
            text: text.into(),
        })
    }

    pub fn menu(chat_id: i64, text: impl Into<String>) -> Self {
        Self::new().with(OutboundAction::ShowMenu {
            chat_id,
            text: text.into(),
        })
    }

    pub fn with(mut self, action: OutboundAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Texts of every `SendText`/`ShowMenu` action, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                OutboundAction::SendText { text, .. } | OutboundAction::ShowMenu { text, .. } => {
                    Some(text.as_str())
                }
                OutboundAction::ScheduleReminder { .. } => None,
            })
            .collect()
    }
}
