//! Bot configuration: BaseConfig (Telegram + log + DB) + AssistantSettings (reminders, history,
//! sessions) + LLM config. Loaded from env.

mod base;
mod bot_config;
mod extensions;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use extensions::AssistantSettings;
