//! Clinic models

use serde::{Deserialize, Deserializer, Serialize};

/// Entry of the clinic directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub clinic_id: String,
    pub clinic_name: String,
}

impl ClinicSummary {
    /// Reply-menu label, parsed back by the clinic item matcher
    pub fn label(&self) -> String {
        format!("{}. {}", self.clinic_id, self.clinic_name)
    }
}

/// Full clinic record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    #[serde(deserialize_with = "string_or_number")]
    pub clinic_id: String,
    pub clinic_name: String,
    #[serde(default)]
    pub clinic_address: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub clinic_postal: String,
    #[serde(default)]
    pub clinic_unit: String,
    #[serde(default)]
    pub clinic_email: String,
    #[serde(default)]
    pub clinic_sub_email: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub clinic_phone: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub clinic_sub_phone: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Accept identifiers and phone numbers sent either as JSON strings or numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}
