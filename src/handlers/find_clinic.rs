//! Find a clinic: search by postal code or list every clinic, then show the
//! details of the selected one.

use crate::models::Clinic;
use crate::state::{handler, Flow, FlowId, Matcher, Menu, MenuContext, Reply, Step, Turn};
use crate::utils::errors::{FlowResult, Result};
use crate::utils::helpers::{escape_markdown, leading_id};
use crate::utils::logging::log_backend_error;
use super::common::{self, ContactBlock, BACK, CLOSE, LIST_ALL_CLINICS};
use super::main_menu;

pub const FLOW: FlowId = FlowId::new("find_clinic");

pub const START: Step = Step::new(0);
pub const CHOOSING: Step = Step::new(1);
pub const LIST_RESULTS: Step = Step::new(2);
pub const CLINIC_DETAILS: Step = Step::new(3);
/// Callback token of the close button
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
    Ok(Reply::new(CHOOSING, "Enter your postal code: \n\n*OR* \n\nPick an option:").with_markup(menu))
}

async fn list_results(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "List Results");

    let postal = turn.text().filter(|text| *text != LIST_ALL_CLINICS);
    let clinics = match turn.backend().list_clinics(postal).await {
        Ok(clinics) => clinics,
        Err(e) => {
            log_backend_error("list_clinics", &e.to_string(), postal);
            Vec::new()
        }
    };

    let text = if clinics.is_empty() {
        "Sorry, I couldn't find any clinics\\. \n\nGo back to try again:"
    } else {
        "Here are the results\\! \n\nSelect a clinic to view more details:"
    };
    let context = MenuContext::with_items(clinics.iter().map(|c| c.label()));
    let menu = turn.menu(LIST_RESULTS, &context);
    Ok(Reply::new(LIST_RESULTS, text).with_markup(menu))
}

async fn clinic_details(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "Clinic Details");

    let clinic_id = leading_id(turn.text().unwrap_or_default(), '.');
    let text = match turn.backend().get_clinic(clinic_id).await {
        Ok(clinic) => render_clinic(&clinic),
        Err(e) => {
            log_backend_error("get_clinic", &e.to_string(), Some(clinic_id));
            "Sorry, the details of this clinic are not available right now\\.".to_string()
        }
    };

    let menu = turn.menu(CLINIC_DETAILS, &MenuContext::empty());
    Ok(Reply::new(CLINIC_DETAILS, text).with_markup(menu))
}

fn render_clinic(clinic: &Clinic) -> String {
    format!(
        "*{}*\n\n*Clinic ID:* {}\n{}",
        escape_markdown(&clinic.clinic_name),
        escape_markdown(&clinic.clinic_id),
        ContactBlock::from(clinic).render()
    )
}

pub fn flow() -> FlowResult<Flow> {
    Ok(Flow::builder(FLOW, "FIND CLINICS NEARBY")
        .entry(Matcher::callback(main_menu::FIND_CLINICS_NEARBY.token()), handler(start))
        .on(CHOOSING, Matcher::pattern(common::POSTAL_CODE_PATTERN)?, handler(list_results))
        .on(CHOOSING, Matcher::text(LIST_ALL_CLINICS), handler(list_results))
        .on(CHOOSING, Matcher::text(CLOSE), handler(common::end))
        .on(LIST_RESULTS, Matcher::text(BACK), handler(start))
        .on(LIST_RESULTS, Matcher::pattern(common::CLINIC_ITEM_PATTERN)?, handler(clinic_details))
        .on(CLINIC_DETAILS, Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(CLOSE_TOKEN.token()), handler(common::end))
        .fallback(Matcher::command("stop"), handler(common::end))
        .menus(layout)
        .build())
}
