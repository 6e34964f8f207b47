//! Error handling for HappySmile
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for HappySmile application
#[derive(Error, Debug)]
pub enum HappySmileError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Flow configuration error: {0}")]
    Flow(#[from] FlowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Clinic backend specific errors
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend timeout")]
    Timeout,

    #[error("Backend returned HTTP {status}")]
    Status { status: u16 },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Backend service unavailable")]
    ServiceUnavailable,
}

/// Conversation engine configuration errors, detected while composing flows
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Flow registered twice: {flow}")]
    DuplicateFlow { flow: String },

    #[error("Entry point {matcher} of flow {flow} overlaps with flow {other}")]
    OverlappingEntryPoints { flow: String, other: String, matcher: String },

    #[error("Nested flow {flow} has no terminal remap for the end state")]
    MissingTerminalRemap { flow: String },

    #[error("Terminal remap of flow {flow} targets step {step}, unknown to parent {parent}")]
    UnknownRemapTarget { flow: String, parent: String, step: i16 },

    #[error("Flow {flow} is embedded into unknown parent {parent}")]
    UnknownParent { flow: String, parent: String },

    #[error("Flow {flow} is embedded into itself through its parents")]
    CyclicEmbedding { flow: String },

    #[error("Nested flow {flow} has no fallback of its own or in an enclosing flow to end it")]
    UnreachableEnd { flow: String },

    #[error("Invalid matcher pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for HappySmile operations
pub type Result<T> = std::result::Result<T, HappySmileError>;

/// Result type alias for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Result type alias for flow composition
pub type FlowResult<T> = std::result::Result<T, FlowError>;

impl HappySmileError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            HappySmileError::Telegram(_) => true,
            HappySmileError::Backend(_) => true,
            HappySmileError::Flow(_) => false,
            HappySmileError::Config(_) => false,
            HappySmileError::ConfigSource(_) => false,
            HappySmileError::Http(_) => true,
            HappySmileError::Serialization(_) => false,
            HappySmileError::Io(_) => true,
            HappySmileError::UrlParse(_) => false,
            HappySmileError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HappySmileError::Flow(_) => ErrorSeverity::Critical,
            HappySmileError::Config(_) => ErrorSeverity::Critical,
            HappySmileError::ConfigSource(_) => ErrorSeverity::Critical,
            HappySmileError::Backend(_) => ErrorSeverity::Warning,
            HappySmileError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
