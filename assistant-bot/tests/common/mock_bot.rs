//! Mock implementation of [`assistant_bot::Bot`] for integration tests.
//!
//! Records every send so tests can assert on replies without hitting Telegram.

use std::sync::{Arc, Mutex};

use assistant_bot::{Bot, DbotError, MenuItem, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Menu { chat_id: i64, text: String, buttons: usize },
    Typing { chat_id: i64 },
}

impl Sent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Sent::Text { text, .. } | Sent::Menu { text, .. } => Some(text),
            Sent::Typing { .. } => None,
        }
    }
}

/// Mock Bot that records sends; a failing bot records the attempt and then returns an error.
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
    tx: mpsc::UnboundedSender<Sent>,
    fail: bool,
}

impl MockBot {
    pub fn new(tx: mpsc::UnboundedSender<Sent>, fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            tx,
            fail,
        }
    }

    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self::new(tx, false)), rx)
    }

    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self::new(tx, true)), rx)
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .iter()
            .filter_map(|s| s.text().map(str::to_string))
            .collect()
    }

    fn record(&self, sent: Sent) -> Result<()> {
        self.sent.lock().unwrap().push(sent.clone());
        let _ = self.tx.send(sent);
        if self.fail {
            return Err(DbotError::Bot("mock send failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.record(Sent::Text {
            chat_id,
            text: text.to_string(),
        })
    }

    async fn send_menu(&self, chat_id: i64, text: &str, items: &[MenuItem]) -> Result<()> {
        self.record(Sent::Menu {
            chat_id,
            text: text.to_string(),
            buttons: items.len(),
        })
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.record(Sent::Typing { chat_id })
    }
}
