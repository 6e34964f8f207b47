//! Pieces shared by the flow handlers: menu labels, item patterns, the
//! goodbye reply and the clinic contact block.

use crate::models::{Appointment, Clinic};
use crate::state::{Reply, Step, Turn};
use crate::utils::errors::Result;
use crate::utils::helpers::escape_markdown;
use crate::utils::logging::log_user_action;

pub const BACK: &str = "⬅️Back";
pub const CLOSE: &str = "❌ Close";
pub const LIST_ALL_CLINICS: &str = "List All Clinics";

/// Six digit postal code
pub const POSTAL_CODE_PATTERN: &str = r"^[0-9]{6}$";
/// Clinic list label, `"<id>. <name>"`
pub const CLINIC_ITEM_PATTERN: &str = r"^[0-9]+[.][ ][ A-Za-z0-9_@./#&():*+-]+$";
/// Singapore NRIC/FIN
pub const NRIC_PATTERN: &str = r"^[STFG]\d{7}[A-Z]$";
/// Appointment list label, `"#<id> | DD/MM/YYYY HH:mm"`
pub const APPOINTMENT_ITEM_PATTERN: &str = r"^#\d+ \| \d{2}/\d{2}/\d{4} \d{2}:\d{2}$";

pub fn goodbye_text(website_url: &str) -> String {
    format!(
        "Alright, I'll see you again soon\\! \n\nFor more information, please visit our website at {}\\.\n\nPress start on the menu or type /start to start the bot again\\.",
        escape_markdown(website_url)
    )
}

/// Leave the active flow, hiding any reply keyboard
pub async fn end(turn: Turn) -> Result<Reply> {
    log_user_action(turn.user_id(), turn.first_name(), turn.process(), Some("Cancelled"));
    Ok(Reply::new(Step::END, goodbye_text(&turn.settings().bot.website_url)).remove_keyboard())
}

/// Log the step a flow handler is rendering
pub fn log_step(turn: &Turn, step: &str) {
    log_user_action(turn.user_id(), turn.first_name(), turn.process(), Some(step));
}

/// Location and contact details of a clinic
pub struct ContactBlock<'a> {
    pub address: &'a str,
    pub unit: &'a str,
    pub postal: &'a str,
    pub email: &'a str,
    pub sub_email: Option<&'a str>,
    pub phone: &'a str,
    pub sub_phone: Option<&'a str>,
}

impl<'a> From<&'a Clinic> for ContactBlock<'a> {
    fn from(clinic: &'a Clinic) -> Self {
        Self {
            address: &clinic.clinic_address,
            unit: &clinic.clinic_unit,
            postal: &clinic.clinic_postal,
            email: &clinic.clinic_email,
            sub_email: clinic.clinic_sub_email.as_deref(),
            phone: &clinic.clinic_phone,
            sub_phone: clinic.clinic_sub_phone.as_deref(),
        }
    }
}

impl<'a> From<&'a Appointment> for ContactBlock<'a> {
    fn from(appt: &'a Appointment) -> Self {
        Self {
            address: &appt.clinic_address,
            unit: &appt.clinic_unit,
            postal: &appt.clinic_postal,
            email: &appt.clinic_email,
            sub_email: appt.clinic_sub_email.as_deref(),
            phone: &appt.clinic_phone,
            sub_phone: appt.clinic_sub_phone.as_deref(),
        }
    }
}

impl ContactBlock<'_> {
    /// MarkdownV2 lines, one field per line
    pub fn render(&self) -> String {
        let sub_email = self
            .sub_email
            .map(escape_markdown)
            .unwrap_or_else(|| "N/A".to_string());
        let sub_phone = self
            .sub_phone
            .map(|phone| format!("\\+65 {}", escape_markdown(phone)))
            .unwrap_or_else(|| "N/A".to_string());

        [
            format!("*Clinic Address:* {}", escape_markdown(self.address)),
            format!("*Unit No\\.:* \\#{}", escape_markdown(self.unit)),
            format!("*Postal:* {}", escape_markdown(self.postal)),
            format!("*Email:* {}", escape_markdown(self.email)),
            format!("*Secondary Email:* {}", sub_email),
            format!("*Phone:* \\+65 {}", escape_markdown(self.phone)),
            format!("*Secondary Phone:* {}", sub_phone),
        ]
        .join("\n")
    }
}
