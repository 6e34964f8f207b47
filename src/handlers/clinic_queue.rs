//! Check clinic queue: pick a clinic and see how long the queue is.

use chrono::Utc;

use crate::models::{Clinic, QueueCount, WaitingTime};
use crate::state::{handler, Flow, FlowId, Matcher, Menu, MenuContext, Reply, Step, Turn};
use crate::utils::errors::{FlowResult, Result};
use crate::utils::helpers::{escape_markdown, format_local_timestamp, leading_id, utc_offset};
use crate::utils::logging::log_backend_error;
use super::common::{self, BACK, CLOSE, LIST_ALL_CLINICS};
use super::main_menu;

pub const FLOW: FlowId = FlowId::new("clinic_queue");

pub const START: Step = Step::new(0);
pub const CHOOSING: Step = Step::new(1);
pub const LIST_RESULTS: Step = Step::new(2);
pub const CLINIC_DETAILS: Step = Step::new(3);
pub const CLOSE_TOKEN: Step = Step::new(4);

fn layout(step: Step, context: &MenuContext) -> Option<Menu> {
    match step {
        START => Some(Menu::reply([LIST_ALL_CLINICS, CLOSE])),
        LIST_RESULTS => Some(Menu::reply(
            std::iter::once(BACK.to_string()).chain(context.items.iter().cloned()),
        )),
        CLINIC_DETAILS => Some(Menu::inline([(BACK, START.token())])),
        _ => None,
    }
}

async fn start(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "Start");
    let menu = turn.menu(START, &MenuContext::empty());
    Ok(Reply::new(CHOOSING, "Pick an option:").with_markup(menu))
}

async fn list_results(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "List Results");

    let clinics = match turn.backend().list_clinics(None).await {
        Ok(clinics) => clinics,
        Err(e) => {
            log_backend_error("list_clinics", &e.to_string(), None);
            Vec::new()
        }
    };

    let text = if clinics.is_empty() {
        "Sorry, no clinics are available right now\\."
    } else {
        "Select a clinic to view its current queue status:"
    };
    let context = MenuContext::with_items(clinics.iter().map(|c| c.label()));
    let menu = turn.menu(LIST_RESULTS, &context);
    Ok(Reply::new(LIST_RESULTS, text).with_markup(menu))
}

async fn queue_status(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "View Clinic Queue Status");

    let clinic_id = leading_id(turn.text().unwrap_or_default(), '.');
    let status = match turn.backend().queue_count(clinic_id).await {
        Ok(queue) => render_queue(&queue),
        Err(e) => {
            log_backend_error("queue_count", &e.to_string(), Some(clinic_id));
            // No queue data means nobody is waiting
            match turn.backend().get_clinic(clinic_id).await {
                Ok(clinic) => render_empty_queue(&clinic),
                Err(e) => {
                    log_backend_error("get_clinic", &e.to_string(), Some(clinic_id));
                    "Sorry, the queue status of this clinic is not available right now\\.".to_string()
                }
            }
        }
    };

    let offset = utc_offset(turn.settings().locale.utc_offset_hours);
    let generated_at = format_local_timestamp(Utc::now(), offset);
    let text = format!(
        "{}\n\n_Note: This message is generated at {}\\. Please go back and select the clinic again to get the latest queue status\\._",
        status,
        escape_markdown(&generated_at)
    );

    let menu = turn.menu(CLINIC_DETAILS, &MenuContext::empty());
    Ok(Reply::new(CLINIC_DETAILS, text).with_markup(menu))
}

fn render_queue(queue: &QueueCount) -> String {
    format!(
        "*{}*\n\n{}\n\nCurrently in Queue: *{}*",
        escape_markdown(&queue.clinic_name),
        WaitingTime::from_count(queue.count).banner(),
        queue.count
    )
}

fn render_empty_queue(clinic: &Clinic) -> String {
    format!(
        "*{}*\n\n{}\n\nCurrently in Queue: *None*",
        escape_markdown(&clinic.clinic_name),
        WaitingTime::Short.banner()
    )
}

pub fn flow() -> FlowResult<Flow> {
    Ok(Flow::builder(FLOW, "GET CLINIC QUEUE")
        .entry(Matcher::callback(main_menu::GET_CLINIC_QUEUE.token()), handler(start))
        .on(CHOOSING, Matcher::text(LIST_ALL_CLINICS), handler(list_results))
        .on(CHOOSING, Matcher::text(CLOSE), handler(common::end))
        .on(LIST_RESULTS, Matcher::text(BACK), handler(start))
        .on(LIST_RESULTS, Matcher::pattern(common::CLINIC_ITEM_PATTERN)?, handler(queue_status))
        .on(CLINIC_DETAILS, Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(CLOSE_TOKEN.token()), handler(common::end))
        .fallback(Matcher::command("stop"), handler(common::end))
        .menus(layout)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_queue_bands() {
        let queue = QueueCount { clinic_name: "Happy Teeth".to_string(), count: 7 };
        let text = render_queue(&queue);
        assert!(text.contains("MODERATE WAITING TIME"));
        assert!(text.ends_with("Currently in Queue: *7*"));
    }
}
