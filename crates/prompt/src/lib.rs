//! # Prompt
//!
//! Turns prior question/answer pairs into a bounded context block and a model request into a
//! role-tagged message list.
//!
//! ## Format
//!
//! - **System**: category role text
//! - **Conversation (recent)**: section title + `User: ...` / `Assistant: ...` lines, oldest first
//! - **Question**: the current user message
//!
//! ## External interactions
//!
//! - **AI models**: output is sent to OpenAI-compatible chat APIs by `llm-client`.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Section title for prior exchanges in the same category.
pub const SECTION_RECENT: &str = "Conversation (recent):";

/// Everything a model delegation needs: role text, prior context and the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub system_role: String,
    /// Context block; empty when the user has no history in this category.
    pub context: String,
    pub user_message: String,
}

impl ModelRequest {
    pub fn new(
        system_role: impl Into<String>,
        context: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            system_role: system_role.into(),
            context: context.into(),
            user_message: user_message.into(),
        }
    }

    /// Message list in API order: system → optional context (user) → question (user).
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_role.as_str())];
        if !self.context.trim().is_empty() {
            messages.push(ChatMessage::user(self.context.as_str()));
        }
        messages.push(ChatMessage::user(self.user_message.as_str()));
        messages
    }
}

/// Caps on how much history goes into one context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    /// Most recent pairs kept.
    pub max_pairs: usize,
    /// Budget for the whole block, in [`estimate_tokens`] units.
    pub max_tokens: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_pairs: 10,
            max_tokens: 2000,
        }
    }
}

/// Estimates the token count for a text string.
pub fn estimate_tokens(text: &str) -> usize {
    ((text.len() as f64) / 4.0).ceil().max(1.0) as usize
}

fn format_pair(question: &str, answer: &str) -> String {
    format!("User: {}\nAssistant: {}\n", question, answer)
}

/// Builds the context block from pairs given oldest first.
///
/// Keeps at most `limits.max_pairs` of the newest pairs, then drops the oldest remaining pairs
/// until the block fits `limits.max_tokens`. Returns an empty string when nothing fits.
pub fn format_context_block<I, Q, A>(pairs: I, limits: ContextLimits) -> String
where
    I: IntoIterator<Item = (Q, A)>,
    Q: AsRef<str>,
    A: AsRef<str>,
{
    let lines: Vec<String> = pairs
        .into_iter()
        .map(|(q, a)| format_pair(q.as_ref(), a.as_ref()))
        .collect();

    let skip = lines.len().saturating_sub(limits.max_pairs);
    let mut kept = &lines[skip..];

    let header_tokens = estimate_tokens(SECTION_RECENT);
    let mut total: usize = header_tokens + kept.iter().map(|l| estimate_tokens(l)).sum::<usize>();
    while !kept.is_empty() && total > limits.max_tokens {
        total -= estimate_tokens(&kept[0]);
        kept = &kept[1..];
    }

    if kept.is_empty() {
        return String::new();
    }

    let mut out = String::from(SECTION_RECENT);
    out.push('\n');
    for line in kept {
        out.push_str(line);
    }
    out
}
