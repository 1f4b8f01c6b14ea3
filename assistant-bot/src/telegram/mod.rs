//! Telegram layer: update → event adapters, Bot implementation, inline keyboard, dispatcher runner.

mod adapters;
mod bot_adapter;
mod keyboard;
mod runner;

pub use adapters::{event_from_callback, event_from_callback_data, event_from_message, event_from_text};
pub use bot_adapter::TelegramBotAdapter;
pub use keyboard::menu_keyboard;
pub use runner::{build_teloxide_bot, run_dispatcher};
