use super::category::MenuItem;

/// What the transport hands to the router. `chat_id` is where replies go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/start` or `/menu`.
    Start { user_id: i64, chat_id: i64 },
    MenuSelection {
        user_id: i64,
        chat_id: i64,
        item: MenuItem,
    },
    TextMessage {
        user_id: i64,
        chat_id: i64,
        text: String,
    },
}

impl InboundEvent {
    pub fn user_id(&self) -> i64 {
        match self {
            InboundEvent::Start { user_id, .. }
            | InboundEvent::MenuSelection { user_id, .. }
            | InboundEvent::TextMessage { user_id, .. } => *user_id,
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            InboundEvent::Start { chat_id, .. }
            | InboundEvent::MenuSelection { chat_id, .. }
            | InboundEvent::TextMessage { chat_id, .. } => *chat_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Start { .. } => "start",
            InboundEvent::MenuSelection { .. } => "menu_selection",
            InboundEvent::TextMessage { .. } => "text_message",
        }
    }
}
