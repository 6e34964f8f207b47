//! Appointment models

use serde::{Deserialize, Serialize};
use super::clinic::{string_or_number, optional_string_or_number};

/// Entry of a patient's upcoming appointment list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub appt_id: String,
    /// Formatted as `DD/MM/YYYY HH:mm` by the backend
    pub start_date_time: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl AppointmentSummary {
    /// Reply-menu label, parsed back by the appointment item matcher
    pub fn label(&self) -> String {
        format!("#{} | {}", self.appt_id, self.start_date_time)
    }
}

/// Full appointment record including the clinic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub start_date_time: String,
    pub status: String,
    pub clinic_name: String,
    #[serde(default)]
    pub clinic_address: String,
    #[serde(default)]
    pub clinic_unit: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub clinic_postal: String,
    #[serde(default)]
    pub clinic_email: String,
    #[serde(default)]
    pub clinic_sub_email: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub clinic_phone: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub clinic_sub_phone: Option<String>,
}

impl Appointment {
    pub fn is_upcoming(&self) -> bool {
        self.status == "Upcoming"
    }
}
