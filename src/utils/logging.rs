//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the HappySmile application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held by `main`.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, first_name: &str, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        user = first_name,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log a committed state transition
pub fn log_transition(chat_id: i64, from: Option<&str>, to: Option<&str>) {
    debug!(
        chat_id = chat_id,
        from = from.unwrap_or("idle"),
        to = to.unwrap_or("idle"),
        "Conversation state committed"
    );
}

/// Log an inbound event that no matcher accepted
pub fn log_dropped_event(chat_id: i64, state: Option<&str>, payload: &str) {
    debug!(
        chat_id = chat_id,
        state = state.unwrap_or("idle"),
        payload = payload,
        "No matcher accepted event, dropping"
    );
}

/// Log backend errors with context
pub fn log_backend_error(endpoint: &str, error: &str, context: Option<&str>) {
    warn!(
        endpoint = endpoint,
        error = error,
        context = context,
        "Backend request failed, treating as no data"
    );
}

/// Log transport errors with context
pub fn log_transport_error(operation: &str, chat_id: i64, error: &str) {
    error!(
        operation = operation,
        chat_id = chat_id,
        error = error,
        "Transport operation failed"
    );
}
