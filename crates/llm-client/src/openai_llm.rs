//! OpenAI-backed [`LlmClient`]: converts a [`ModelRequest`] to chat messages and returns the
//! first choice's text.

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use prompt::{ChatMessage, MessageRole, ModelRequest};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::LlmConfig;
use crate::{LlmClient, ModelError};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// OpenAI chat client bound to one model.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    masked_key: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: "gpt-3.5-turbo".to_string(),
            masked_key,
        }
    }

    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, ModelError> {
    let content = msg.content.clone();
    let converted: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))?
            .into(),
    };
    Ok(converted)
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &ModelRequest) -> Result<String, ModelError> {
        let messages = request
            .to_messages()
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            message_count = messages.len(),
            api_key = %self.masked_key,
            "OpenAI chat_completion request"
        );

        let api_request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))?;

        if let Ok(json) = serde_json::to_string(&api_request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let response = self
            .client
            .chat()
            .create(api_request)
            .await
            .map_err(|e| ModelError::Upstream(e.to_string()))?;

        if let Some(ref u) = response.usage {
            info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_model() {
        let client = OpenAILlmClient::new("dummy_key".to_string()).with_model("gpt-4o-mini".to_string());
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_chat_message_to_openai_roles() {
        for msg in [
            ChatMessage::system("s"),
            ChatMessage::user("u"),
            ChatMessage::assistant("a"),
        ] {
            assert!(chat_message_to_openai(&msg).is_ok());
        }
    }
}
