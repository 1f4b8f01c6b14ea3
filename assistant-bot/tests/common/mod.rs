//! Shared helpers for assistant-bot integration tests: mock transport, mock model, and a
//! component harness on in-memory SQLite.
#![allow(dead_code)]

pub mod mock_bot;
pub mod mock_history;
pub mod mock_llm;

use std::sync::Arc;
use std::time::Duration;

use assistant_bot::{
    build_bot_components, AssistantSettings, BotComponents, DialogueRouter, RouterSettings,
};
use storage::HistoryStore;
use tokio::sync::mpsc;

use mock_bot::{MockBot, Sent};
use mock_llm::MockLlm;

pub const USER: i64 = 1001;

pub struct Harness {
    pub components: BotComponents,
    pub bot: Arc<MockBot>,
    pub sent_rx: mpsc::UnboundedReceiver<Sent>,
    pub llm: Arc<MockLlm>,
}

/// Defaults with a fast reminder poll so firing tests finish quickly.
pub fn test_settings() -> AssistantSettings {
    AssistantSettings {
        reminder_poll_interval_ms: 20,
        ..AssistantSettings::default()
    }
}

pub async fn harness(llm: Arc<MockLlm>) -> Harness {
    harness_with(llm, test_settings(), Duration::from_secs(5)).await
}

pub async fn harness_with(
    llm: Arc<MockLlm>,
    settings: AssistantSettings,
    llm_timeout: Duration,
) -> Harness {
    let (bot, sent_rx) = MockBot::with_receiver();
    let components = build_bot_components(
        "sqlite::memory:",
        &settings,
        llm_timeout,
        bot.clone(),
        llm.clone(),
    )
    .await
    .expect("build components");
    Harness {
        components,
        bot,
        sent_rx,
        llm,
    }
}

/// Waits for the next non-typing send, or `None` after `timeout`.
pub async fn next_reply(
    rx: &mut mpsc::UnboundedReceiver<Sent>,
    timeout: Duration,
) -> Option<Sent> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let sent = tokio::time::timeout_at(deadline, rx.recv()).await.ok()??;
        if !matches!(sent, Sent::Typing { .. }) {
            return Some(sent);
        }
    }
}

/// A router sharing the harness's sessions, model, reminders and bot, reading and writing
/// history through `history` instead of SQLite.
pub fn router_with_history(h: &Harness, history: Arc<dyn HistoryStore>) -> DialogueRouter {
    DialogueRouter::new(
        Arc::clone(&h.components.sessions),
        history,
        h.llm.clone(),
        Arc::clone(&h.components.reminders),
        h.bot.clone(),
        RouterSettings::default(),
    )
}
