//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Escape MarkdownV2 special characters
pub fn escape_markdown(text: &str) -> String {
    text.replace('\\', r"\\")
        .replace('_', r"\_")
        .replace('*', r"\*")
        .replace('[', r"\[")
        .replace(']', r"\]")
        .replace('(', r"\(")
        .replace(')', r"\)")
        .replace('~', r"\~")
        .replace('`', r"\`")
        .replace('>', r"\>")
        .replace('#', r"\#")
        .replace('+', r"\+")
        .replace('-', r"\-")
        .replace('=', r"\=")
        .replace('|', r"\|")
        .replace('{', r"\{")
        .replace('}', r"\}")
        .replace('.', r"\.")
        .replace('!', r"\!")
}

/// Build a fixed offset from whole hours, falling back to UTC when out of range
pub fn utc_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Format a timestamp the way notes are shown to users (dd/mm/YYYY HH:MM:SS)
pub fn format_local_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp.with_timezone(&offset).format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Take the leading identifier of a menu label such as `"12. Smile Clinic"` or `"#7 | ..."`
pub fn leading_id(label: &str, separator: char) -> &str {
    label
        .split(separator)
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('#')
}
