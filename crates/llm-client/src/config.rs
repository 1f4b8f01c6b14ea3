//! LLM configuration: trait and env-based implementation.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LlmConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn timeout(&self) -> Duration;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. `OPENAI_API_KEY` is required.
    pub fn from_env() -> Result<Self, LlmConfigError> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(LlmConfigError::Missing("OPENAI_API_KEY"))?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let llm_model = env::var("MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let llm_timeout_secs = match env::var("LLM_TIMEOUT_SECS") {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(LlmConfigError::Invalid {
                        var: "LLM_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for var in ["OPENAI_API_KEY", "OPENAI_BASE_URL", "MODEL", "LLM_TIMEOUT_SECS"] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear();
        env::set_var("OPENAI_API_KEY", "test_key");
        let config = EnvLlmConfig::from_env().unwrap();
        assert_eq!(config.api_key(), "test_key");
        assert_eq!(config.base_url(), "https://api.openai.com/v1");
        assert_eq!(config.model(), "gpt-3.5-turbo");
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        clear();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_key() {
        clear();
        assert_eq!(
            EnvLlmConfig::from_env().unwrap_err(),
            LlmConfigError::Missing("OPENAI_API_KEY")
        );
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout() {
        clear();
        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("LLM_TIMEOUT_SECS", "soon");
        assert!(matches!(
            EnvLlmConfig::from_env(),
            Err(LlmConfigError::Invalid { var: "LLM_TIMEOUT_SECS", .. })
        ));
        clear();
    }
}
