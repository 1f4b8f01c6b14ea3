//! Base config: Telegram Bot connection, logging, database. Loaded from env.

use std::env;

use crate::core::ConfigError;

/// Base config: Telegram-related, logging, database only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// SQLite database URL for history and reminders
    pub database_url: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self, ConfigError> {
        let bot_token = token
            .or_else(|| env::var("BOT_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./assistant_bot.db".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/assistant-bot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
        })
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref url_str) = self.telegram_api_url {
            if let Err(e) = reqwest::Url::parse(url_str) {
                return Err(ConfigError::invalid(
                    "TELEGRAM_API_URL",
                    url_str.as_str(),
                    e.to_string(),
                ));
            }
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::invalid("DATABASE_URL", "", "must not be empty"));
        }
        Ok(())
    }
}
