//! BotConfig: BaseConfig + AssistantSettings + LLM config. Use load() for env-based loading.

use llm_client::{EnvLlmConfig, LlmConfig, LlmConfigError};

use super::{AssistantSettings, BaseConfig};
use crate::core::ConfigError;

/// Full bot config. Use BotConfig::load() for env-based loading.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub assistant: AssistantSettings,
    pub llm: EnvLlmConfig,
}

impl From<LlmConfigError> for ConfigError {
    fn from(e: LlmConfigError) -> Self {
        match e {
            LlmConfigError::Missing(var) => ConfigError::Missing(var),
            LlmConfigError::Invalid { var, value } => {
                ConfigError::invalid(var, value, "expected a positive number of seconds")
            }
        }
    }
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self, ConfigError> {
        let base = BaseConfig::load(token)?;
        let assistant = AssistantSettings::from_env()?;
        let llm = EnvLlmConfig::from_env()?;
        Ok(Self {
            base,
            assistant,
            llm,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        self.assistant.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn assistant(&self) -> &AssistantSettings {
        &self.assistant
    }
    pub fn llm(&self) -> &dyn LlmConfig {
        &self.llm
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
