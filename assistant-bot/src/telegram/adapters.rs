//! Converts Telegram updates into [`InboundEvent`]s.
//!
//! `/start` and `/menu` (optionally addressed as `/start@botname`) become `Start`; other commands
//! are ignored; any other text is a `TextMessage`.

use crate::core::{InboundEvent, MenuItem};

const MENU_COMMANDS: [&str; 2] = ["start", "menu"];

/// Event for a text message, or `None` if it should be ignored.
pub fn event_from_text(user_id: i64, chat_id: i64, text: &str) -> Option<InboundEvent> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(command) = trimmed.strip_prefix('/') {
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        return MENU_COMMANDS
            .contains(&name.as_str())
            .then_some(InboundEvent::Start { user_id, chat_id });
    }

    Some(InboundEvent::TextMessage {
        user_id,
        chat_id,
        text: trimmed.to_string(),
    })
}

/// Event for a menu button press, or `None` for unknown callback data.
pub fn event_from_callback_data(user_id: i64, chat_id: i64, data: &str) -> Option<InboundEvent> {
    MenuItem::from_callback_data(data).map(|item| InboundEvent::MenuSelection {
        user_id,
        chat_id,
        item,
    })
}

pub fn event_from_message(msg: &teloxide::types::Message) -> Option<InboundEvent> {
    let chat_id = msg.chat.id.0;
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(chat_id);
    event_from_text(user_id, chat_id, msg.text()?)
}

/// Menu buttons are only offered in private chats, so replies go to the presser's own chat.
pub fn event_from_callback(q: &teloxide::types::CallbackQuery) -> Option<InboundEvent> {
    let user_id = q.from.id.0 as i64;
    event_from_callback_data(user_id, user_id, q.data.as_deref()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_menu_commands() {
        assert_eq!(
            event_from_text(1, 10, "/start"),
            Some(InboundEvent::Start { user_id: 1, chat_id: 10 })
        );
        assert_eq!(
            event_from_text(1, 10, "/menu@assistant_bot"),
            Some(InboundEvent::Start { user_id: 1, chat_id: 10 })
        );
        assert_eq!(
            event_from_text(1, 10, "/START now"),
            Some(InboundEvent::Start { user_id: 1, chat_id: 10 })
        );
    }

    #[test]
    fn test_other_commands_and_blank_text_are_ignored() {
        assert_eq!(event_from_text(1, 10, "/help"), None);
        assert_eq!(event_from_text(1, 10, "   "), None);
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(
            event_from_text(1, 10, "  Buy milk | 2030-01-01 10:00 \n"),
            Some(InboundEvent::TextMessage {
                user_id: 1,
                chat_id: 10,
                text: "Buy milk | 2030-01-01 10:00".to_string()
            })
        );
    }

    #[test]
    fn test_callback_data() {
        assert_eq!(
            event_from_callback_data(5, 5, "diary"),
            Some(InboundEvent::MenuSelection {
                user_id: 5,
                chat_id: 5,
                item: MenuItem::Diary
            })
        );
        assert_eq!(event_from_callback_data(5, 5, "weather"), None);
    }
}
