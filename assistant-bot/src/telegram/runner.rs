//! Dispatcher runner: builds the teloxide Bot and routes message and callback updates into the
//! [`UserDispatcher`]. Runs until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use crate::dispatch::UserDispatcher;
use crate::router::messages::MSG_UNKNOWN_MENU_ITEM;

use super::adapters::{event_from_callback, event_from_message};

/// Creates the teloxide Bot, pointing it at a custom Bot API server when `api_url` is set.
pub fn build_teloxide_bot(token: &str, api_url: Option<&str>) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(token);
    match api_url {
        Some(url_str) => {
            let url = reqwest::Url::parse(url_str)?;
            info!(url = %url, "Using custom Telegram API URL");
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

async fn handle_message(msg: Message, dispatcher: Arc<UserDispatcher>) -> ResponseResult<()> {
    match event_from_message(&msg) {
        Some(event) => {
            info!(
                user_id = event.user_id(),
                chat_id = event.chat_id(),
                kind = event.kind(),
                "Received message"
            );
            if let Err(e) = dispatcher.dispatch(event) {
                error!(error = %e, "Failed to enqueue message");
            }
        }
        None => info!(chat_id = msg.chat.id.0, "Ignoring non-routable message"),
    }
    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dispatcher: Arc<UserDispatcher>,
) -> ResponseResult<()> {
    let event = event_from_callback(&q);

    let answer = bot.answer_callback_query(q.id.clone());
    let answered = match event {
        Some(_) => answer.await,
        None => answer.text(MSG_UNKNOWN_MENU_ITEM).await,
    };
    if let Err(e) = answered {
        warn!(error = %e, "Failed to answer callback query");
    }

    if let Some(event) = event {
        info!(user_id = event.user_id(), "Received menu selection");
        if let Err(e) = dispatcher.dispatch(event) {
            error!(error = %e, "Failed to enqueue menu selection");
        }
    }
    Ok(())
}

/// Runs the long-polling dispatcher until Ctrl-C.
#[instrument(skip(bot, dispatcher))]
pub async fn run_dispatcher(bot: teloxide::Bot, dispatcher: Arc<UserDispatcher>) {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Connected to Telegram");
        }
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
