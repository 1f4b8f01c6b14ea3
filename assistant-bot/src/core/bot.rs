//! Bot trait: the outbound side of the transport. Production uses Telegram; tests use a recording mock.

use async_trait::async_trait;

use super::error::Result;
use super::types::MenuItem;

/// Abstraction over the chat transport.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends plain text to the chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Sends text with one inline button per menu item.
    async fn send_menu(&self, chat_id: i64, text: &str, items: &[MenuItem]) -> Result<()>;

    /// Shows the "typing" indicator. Best-effort; callers ignore failures.
    async fn send_typing(&self, chat_id: i64) -> Result<()>;
}
