//! Get appointments: look up a patient's upcoming appointments by NRIC.

use crate::models::{Appointment, AppointmentSummary};
use crate::state::{handler, Flow, FlowId, Matcher, Menu, MenuContext, Reply, Step, Turn};
use crate::utils::errors::{FlowResult, Result};
use crate::utils::helpers::{escape_markdown, leading_id};
use crate::utils::logging::log_backend_error;
use super::common::{self, ContactBlock, BACK};
use super::main_menu;

pub const FLOW: FlowId = FlowId::new("get_appointments");

pub const START: Step = Step::new(0);
pub const CHOOSING: Step = Step::new(1);
pub const LIST_APPOINTMENTS: Step = Step::new(2);
pub const APPOINTMENT_DETAILS: Step = Step::new(3);
pub const CLOSE_TOKEN: Step = Step::new(4);

fn layout(step: Step, context: &MenuContext) -> Option<Menu> {
    match step {
        START => Some(Menu::inline([("Nah, I'm good.", CLOSE_TOKEN.token())])),
        LIST_APPOINTMENTS => Some(Menu::reply(
            context.items.iter().cloned().chain(std::iter::once(BACK.to_string())),
        )),
        APPOINTMENT_DETAILS => Some(Menu::inline([(BACK, START.token())])),
        _ => None,
    }
}

async fn start(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "Start");
    let menu = turn.menu(START, &MenuContext::empty());
    Ok(Reply::new(CHOOSING, "Enter your NRIC:").with_markup(menu))
}

async fn list_appointments(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "List All Upcoming Appointments");

    let nric = turn.text().unwrap_or_default();
    let appointments = match turn.backend().upcoming_appointments(nric).await {
        Ok(appointments) => appointments,
        Err(e) => {
            // NRIC stays out of the logs
            log_backend_error("upcoming_appointments", &e.to_string(), None);
            Vec::new()
        }
    };

    let context = MenuContext::with_items(appointments.iter().map(AppointmentSummary::label));
    let menu = turn.menu(LIST_APPOINTMENTS, &context);
    Ok(Reply::new(LIST_APPOINTMENTS, listing_text(&appointments)).with_markup(menu))
}

fn listing_text(appointments: &[AppointmentSummary]) -> String {
    match appointments.last() {
        Some(patient) => format!(
            "Welcome back *{} {}*\\! \n\nHere are your upcoming appointments\\! \n\n_Note: Appointments are displayed in the form of DD/MM/YYYY HH:mm format\\._ \n\nSelect an appointment to view more details:",
            escape_markdown(&patient.first_name),
            escape_markdown(&patient.last_name)
        ),
        None => "You have no upcoming appointments\\!".to_string(),
    }
}

async fn appointment_details(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "Appointment Details");

    let appt_id = leading_id(turn.text().unwrap_or_default(), '|');
    let text = match turn.backend().get_appointment(appt_id).await {
        Ok(appointment) => render_appointment(&appointment),
        Err(e) => {
            log_backend_error("get_appointment", &e.to_string(), Some(appt_id));
            "Sorry, the details of this appointment are not available right now\\.".to_string()
        }
    };

    let menu = turn.menu(APPOINTMENT_DETAILS, &MenuContext::empty());
    Ok(Reply::new(APPOINTMENT_DETAILS, text).with_markup(menu))
}

fn render_appointment(appointment: &Appointment) -> String {
    let status_marker = if appointment.is_upcoming() { " 🟢" } else { "" };
    format!(
        "*APPOINTMENT DETAILS* 📝\n\n*Date & Time:* {} ⏰\n*Status:* {}{}\n\n🗺 *LOCATION* 📌\n*Clinic Name:* {}\n{}",
        escape_markdown(&appointment.start_date_time),
        escape_markdown(&appointment.status),
        status_marker,
        escape_markdown(&appointment.clinic_name),
        ContactBlock::from(appointment).render()
    )
}

pub fn flow() -> FlowResult<Flow> {
    Ok(Flow::builder(FLOW, "GET APPOINTMENTS")
        .entry(Matcher::callback(main_menu::GET_APPOINTMENTS.token()), handler(start))
        .on(CHOOSING, Matcher::pattern(common::NRIC_PATTERN)?, handler(list_appointments))
        .on(LIST_APPOINTMENTS, Matcher::pattern(common::APPOINTMENT_ITEM_PATTERN)?, handler(appointment_details))
        .on(LIST_APPOINTMENTS, Matcher::text(BACK), handler(start))
        .on(APPOINTMENT_DETAILS, Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(CLOSE_TOKEN.token()), handler(common::end))
        .fallback(Matcher::command("stop"), handler(common::end))
        .menus(layout)
        .build())
}
