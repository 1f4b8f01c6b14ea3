//! # Assistant bot
//!
//! Menu-driven Telegram assistant. Users pick a category (programming, database, chat) and ask
//! questions answered by a language model with their earlier exchanges as context, or open the
//! diary and enter `task | YYYY-MM-DD HH:MM` lines to get a reminder before the stated time.
//!
//! - [`session`]: per-user mode
//! - [`task_parser`]: diary line parsing
//! - [`router`]: the dialogue state machine
//! - [`reminders`]: persisted reminders on top of `reminder-scheduler`
//! - [`dispatch`]: per-user event serialization
//! - [`telegram`]: teloxide transport

pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod reminders;
pub mod router;
pub mod runner;
pub mod session;
pub mod task_parser;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, BotComponents};
pub use config::{AssistantSettings, BaseConfig, BotConfig};
pub use crate::core::{
    init_tracing, Bot, Category, ConfigError, DbotError, InboundEvent, MenuItem, OutboundAction,
    Result, RouteOutcome,
};
pub use dispatch::{execute_outcome, UserDispatcher};
pub use reminders::{ReminderError, ReminderFireHandler, ReminderPayload, ReminderService};
pub use router::{DialogueRouter, RouterSettings};
pub use runner::{run_bot, spawn_session_sweeper};
pub use session::{Mode, SessionState};
pub use task_parser::{parse_task_line, parse_task_line_in, ParsedTask, TaskParseError};
pub use telegram::TelegramBotAdapter;
