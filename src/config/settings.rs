//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from configuration files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    pub locale: LocaleConfig,
    pub session: SessionConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub name: String,
    pub website_url: String,
}

/// Clinic backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub file_name: String,
}

/// Locale used when rendering timestamps to users
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocaleConfig {
    pub utc_offset_hours: i32,
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Interval of the session statistics log line; 0 disables it
    pub stats_interval_seconds: u64,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::load(config::File::with_name("config").required(false))
    }

    /// Load settings with an explicit file source layered under the environment
    pub fn load<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .set_default("bot.token", defaults.bot.token)?
            .set_default("bot.name", defaults.bot.name)?
            .set_default("bot.website_url", defaults.bot.website_url)?
            .set_default("backend.base_url", defaults.backend.base_url)?
            .set_default("backend.timeout_seconds", defaults.backend.timeout_seconds)?
            .set_default("backend.user_agent", defaults.backend.user_agent)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.file_path", defaults.logging.file_path)?
            .set_default("logging.file_name", defaults.logging.file_name)?
            .set_default("locale.utc_offset_hours", defaults.locale.utc_offset_hours as i64)?
            .set_default("session.stats_interval_seconds", defaults.session.stats_interval_seconds)?
            .add_source(file)
            .add_source(config::Environment::with_prefix("HAPPYSMILE").prefix_separator("_").separator("__"))
            .set_override_option("bot.token", std::env::var("TELEGRAM_BOT_API_TOKEN").ok())?
            .set_override_option("bot.website_url", std::env::var("WEBSITE_URL").ok())?
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::HappySmileError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                name: "HappySmile Assistant Bot".to_string(),
                website_url: "https://happy-smile-dhrms.herokuapp.com/".to_string(),
            },
            backend: BackendConfig {
                base_url: "https://happy-smile-dhrms.herokuapp.com/".to_string(),
                timeout_seconds: 10,
                user_agent: "HappySmile-Bot/1.0".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
                file_name: "happysmile.log".to_string(),
            },
            locale: LocaleConfig {
                utc_offset_hours: 8,
            },
            session: SessionConfig {
                stats_interval_seconds: 300,
            },
        }
    }
}
