//! Core types and traits: Bot, inbound events, outbound actions, error, logger.
//! Transport-agnostic.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{ConfigError, DbotError, Result};
pub use logger::init_tracing;
pub use types::{Category, InboundEvent, MenuItem, OutboundAction, RouteOutcome};
