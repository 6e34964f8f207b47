//! HappySmile Assistant Telegram Bot
//!
//! A menu-driven Telegram assistant for dental clinic patients: find a clinic,
//! look up upcoming appointments, check clinic queues and browse the FAQ.
//! Conversations run on a small state-machine engine with nested flows.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{HappySmileError, Result};

// Re-export main components for easy access
pub use handlers::build_registry;
pub use services::ServiceFactory;
pub use state::{ConversationDispatcher, DispatchOutcome, FlowRegistry, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
