//! Builds the shared components (storage, sessions, reminders, router, dispatcher) from config.
//! The transport and model client are injected so tests can pass mocks.

use std::sync::Arc;
use std::time::Duration;

use llm_client::LlmClient;
use storage::{InteractionRepository, ReminderRepository, SqlitePoolManager, StorageError};
use tracing::{info, instrument};

use crate::config::AssistantSettings;
use crate::core::Bot;
use crate::dispatch::UserDispatcher;
use crate::reminders::ReminderService;
use crate::router::{DialogueRouter, RouterSettings};
use crate::session::SessionState;

#[derive(Clone)]
pub struct BotComponents {
    pub sessions: Arc<SessionState>,
    pub history: Arc<InteractionRepository>,
    pub reminders: Arc<ReminderService>,
    pub router: Arc<DialogueRouter>,
    pub dispatcher: Arc<UserDispatcher>,
}

/// Opens the database (running migrations) and wires every component around `bot` and `llm`.
/// The reminder scheduler is built but not started.
#[instrument(skip(settings, bot, llm))]
pub async fn build_bot_components(
    database_url: &str,
    settings: &AssistantSettings,
    llm_timeout: Duration,
    bot: Arc<dyn Bot>,
    llm: Arc<dyn LlmClient>,
) -> Result<BotComponents, StorageError> {
    let pool_manager = SqlitePoolManager::new(database_url).await?;
    let history = Arc::new(InteractionRepository::with_pool(pool_manager.clone()).await?);
    let reminder_repo = ReminderRepository::with_pool(pool_manager).await?;

    let reminders = Arc::new(ReminderService::with_bot(
        reminder_repo,
        Arc::clone(&bot),
        settings.scheduler_config(),
    ));
    let sessions = Arc::new(SessionState::new());
    let router = Arc::new(DialogueRouter::new(
        Arc::clone(&sessions),
        history.clone(),
        llm,
        Arc::clone(&reminders),
        Arc::clone(&bot),
        RouterSettings {
            reminder_lead: settings.reminder_lead(),
            context_limits: settings.context_limits(),
            llm_timeout,
        },
    ));
    let dispatcher = Arc::new(UserDispatcher::new(Arc::clone(&router), bot));

    info!(database_url = %database_url, "Bot components ready");
    Ok(BotComponents {
        sessions,
        history,
        reminders,
        router,
        dispatcher,
    })
}
