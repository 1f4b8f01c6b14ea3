//! Mock [`llm_client::LlmClient`]: echoes the question, fails, or answers slowly.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use llm_client::{LlmClient, ModelError};
use prompt::ModelRequest;

enum Behavior {
    Echo,
    Fail,
}

pub struct MockLlm {
    requests: Mutex<Vec<ModelRequest>>,
    behavior: Behavior,
    delay: Option<Duration>,
}

impl MockLlm {
    /// Answers `answer: <question>`.
    pub fn echo() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            behavior: Behavior::Echo,
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            ..Self::echo()
        }
    }

    /// Echoes after sleeping `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::echo()
        }
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn answer_for(question: &str) -> String {
        format!("answer: {}", question)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, request: &ModelRequest) -> Result<String, ModelError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.behavior {
            Behavior::Echo => Ok(Self::answer_for(&request.user_message)),
            Behavior::Fail => Err(ModelError::Upstream("upstream exploded: 500".to_string())),
        }
    }
}
