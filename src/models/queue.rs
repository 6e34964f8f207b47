//! Clinic queue model

use serde::{Deserialize, Serialize};

/// Current queue length of one clinic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueCount {
    pub clinic_name: String,
    pub count: u32,
}

/// Waiting time band derived from the queue length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitingTime {
    Short,
    Moderate,
    Long,
}

impl WaitingTime {
    pub fn from_count(count: u32) -> Self {
        match count {
            0..=4 => WaitingTime::Short,
            5..=9 => WaitingTime::Moderate,
            _ => WaitingTime::Long,
        }
    }

    /// MarkdownV2 banner shown above the queue count
    pub fn banner(self) -> &'static str {
        match self {
            WaitingTime::Short => "🟢 *SHORT WAITING TIME* 🟢",
            WaitingTime::Moderate => "🟡 *MODERATE WAITING TIME* 🟡",
            WaitingTime::Long => "🔴 *LONG WAITING TIME* 🔴",
        }
    }
}
