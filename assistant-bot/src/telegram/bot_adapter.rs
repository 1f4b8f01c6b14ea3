//! [`crate::core::Bot`] over teloxide: plain replies, the menu keyboard and the typing action.

use crate::core::{Bot as CoreBot, DbotError, MenuItem, Result};
use async_trait::async_trait;
use teloxide::{prelude::*, types::ChatAction, types::ChatId};

use super::keyboard::menu_keyboard;

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_menu(&self, chat_id: i64, text: &str, items: &[MenuItem]) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .reply_markup(menu_keyboard(items))
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}
