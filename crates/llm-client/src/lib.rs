//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait (one request in, one answer string out) and an OpenAI
//! implementation. Callers treat the model as an opaque function; every failure, including a
//! timeout, comes back as a [`ModelError`].

use async_trait::async_trait;
use prompt::ModelRequest;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig, LlmConfigError};
pub use openai_llm::{mask_token, OpenAILlmClient};

/// Why a model delegation produced no answer.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Upstream(String),

    #[error("model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("invalid model request: {0}")]
    InvalidRequest(String),
}

/// Model delegation interface: `(system role, prior context, user message) -> answer`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &ModelRequest) -> Result<String, ModelError>;
}

/// Runs `client.complete` under a deadline. Dropping the inner future on expiry cancels the call.
pub async fn complete_with_timeout(
    client: &dyn LlmClient,
    request: &ModelRequest,
    timeout: Duration,
) -> Result<String, ModelError> {
    match tokio::time::timeout(timeout, client.complete(request)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Model call timed out");
            Err(ModelError::Timeout(timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowClient(Duration);

    #[async_trait]
    impl LlmClient for SlowClient {
        async fn complete(&self, _request: &ModelRequest) -> Result<String, ModelError> {
            tokio::time::sleep(self.0).await;
            Ok("late answer".to_string())
        }
    }

    #[tokio::test]
    async fn test_complete_with_timeout_expires() {
        let client = SlowClient(Duration::from_millis(500));
        let request = ModelRequest::new("role", "", "question");
        let result = complete_with_timeout(&client, &request, Duration::from_millis(20)).await;
        assert!(matches!(result, Err(ModelError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_complete_with_timeout_passes_answer_through() {
        let client = SlowClient(Duration::from_millis(1));
        let request = ModelRequest::new("role", "", "question");
        let result = complete_with_timeout(&client, &request, Duration::from_secs(5)).await;
        assert_eq!(result.unwrap(), "late answer");
    }
}
