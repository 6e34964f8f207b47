//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;
use crate::utils::errors::{HappySmileError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_backend_config(&settings.backend)?;
    validate_logging_config(&settings.logging)?;
    validate_locale_config(&settings.locale)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(HappySmileError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.name.is_empty() {
        return Err(HappySmileError::Config(
            "Bot name is required".to_string()
        ));
    }

    Url::parse(&config.website_url).map_err(|e| {
        HappySmileError::Config(format!("Invalid website URL {}: {}", config.website_url, e))
    })?;

    Ok(())
}

/// Validate backend configuration
fn validate_backend_config(config: &super::BackendConfig) -> Result<()> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        HappySmileError::Config(format!("Invalid backend URL {}: {}", config.base_url, e))
    })?;

    if url.cannot_be_a_base() {
        return Err(HappySmileError::Config(
            format!("Backend URL cannot be used as a base: {}", config.base_url)
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(HappySmileError::Config(
            "Backend timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(HappySmileError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(HappySmileError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if config.file_name.is_empty() {
        return Err(HappySmileError::Config(
            "Log file name is required".to_string()
        ));
    }

    Ok(())
}

/// Validate locale configuration
fn validate_locale_config(config: &super::LocaleConfig) -> Result<()> {
    if !(-14..=14).contains(&config.utc_offset_hours) {
        return Err(HappySmileError::Config(
            format!("UTC offset out of range: {}", config.utc_offset_hours)
        ));
    }

    Ok(())
}
