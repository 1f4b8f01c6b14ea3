use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use llm_client::{mask_token, LlmClient, OpenAILlmClient};
use tokio::task::JoinHandle;
use tracing::{info, instrument};

use crate::components::build_bot_components;
use crate::config::BotConfig;
use crate::core::{init_tracing, Bot};
use crate::session::SessionState;
use crate::telegram::{build_teloxide_bot, run_dispatcher, TelegramBotAdapter};

/// Longest pause between two session sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Periodically evicts sessions idle for longer than `ttl`.
pub fn spawn_session_sweeper(sessions: Arc<SessionState>, ttl: Duration) -> JoinHandle<()> {
    let period = ttl.min(MAX_SWEEP_INTERVAL).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let evicted = sessions.evict_idle(ttl);
            if evicted > 0 {
                info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
            }
        }
    })
}

/// Main entry: validate config, init logging, open storage, restore reminders, then run the
/// Telegram dispatcher until Ctrl-C and shut the scheduler down.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        database_url = %config.database_url(),
        model = %config.llm().model(),
        llm_base_url = %config.llm().base_url(),
        api_key = %mask_token(config.llm().api_key()),
        "Initializing bot"
    );

    let teloxide_bot = build_teloxide_bot(config.bot_token(), config.telegram_api_url())?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::from_config(config.llm()));

    let components = build_bot_components(
        config.database_url(),
        config.assistant(),
        config.llm().timeout(),
        bot,
        llm,
    )
    .await?;

    components.reminders.restore_pending().await?;
    components.reminders.start()?;
    let sweeper = spawn_session_sweeper(
        Arc::clone(&components.sessions),
        config.assistant().session_idle_ttl(),
    );

    info!("Bot started successfully");
    run_dispatcher(teloxide_bot, Arc::clone(&components.dispatcher)).await;

    info!("step: shutting down");
    sweeper.abort();
    let left_pending = components.reminders.shutdown().await;
    info!(left_pending, "Bot stopped");
    Ok(())
}
