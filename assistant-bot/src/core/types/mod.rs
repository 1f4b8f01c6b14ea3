//! Core types: menu items and categories, inbound events, outbound actions.

mod action;
mod category;
mod event;

pub use action::{OutboundAction, RouteOutcome};
pub use category::{Category, MenuItem};
pub use event::InboundEvent;
