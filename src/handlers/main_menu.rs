//! Top-level flow: greets the user and offers the assistant's actions.
//!
//! The child flows hang off [`SELECTING_ACTION`]; the action steps below double
//! as the callback tokens of their buttons.

use crate::state::{handler, Flow, FlowId, Matcher, Menu, MenuContext, Reply, Step, Turn};
use crate::utils::errors::Result;
use crate::utils::helpers::escape_markdown;
use crate::utils::logging::log_user_action;
use super::common;

pub const FLOW: FlowId = FlowId::new("main_menu");

pub const SELECTING_ACTION: Step = Step::new(0);
pub const GET_APPOINTMENTS: Step = Step::new(1);
pub const FIND_CLINICS_NEARBY: Step = Step::new(2);
pub const GET_CLINIC_QUEUE: Step = Step::new(3);
pub const VIEW_FAQ: Step = Step::new(4);

fn layout(step: Step, _context: &MenuContext) -> Option<Menu> {
    match step {
        SELECTING_ACTION => Some(Menu::inline([
            ("Get appointments", GET_APPOINTMENTS.token()),
            ("Find a clinic", FIND_CLINICS_NEARBY.token()),
            ("Check clinic queue", GET_CLINIC_QUEUE.token()),
            ("View FAQ", VIEW_FAQ.token()),
        ])),
        _ => None,
    }
}

async fn start(turn: Turn) -> Result<Reply> {
    log_user_action(turn.user_id(), turn.first_name(), turn.process(), Some("Started the bot"));

    let text = format!(
        "*Hello {}\\!* \n\nWelcome to {}\\! \n\nWhat do you want to do?",
        escape_markdown(turn.first_name()),
        escape_markdown(&turn.settings().bot.name)
    );
    let menu = turn.menu(SELECTING_ACTION, &MenuContext::empty());
    Ok(Reply::new(SELECTING_ACTION, text).with_markup(menu))
}

async fn stop(turn: Turn) -> Result<Reply> {
    log_user_action(turn.user_id(), turn.first_name(), turn.process(), Some("Terminated the bot"));
    let text = common::goodbye_text(&turn.settings().bot.website_url);
    Ok(Reply::new(Step::END, text).remove_keyboard())
}

pub fn flow() -> Flow {
    Flow::builder(FLOW, "MAIN MENU")
        .entry(Matcher::command("start"), handler(start))
        .step(SELECTING_ACTION)
        .fallback(Matcher::command("stop"), handler(stop))
        .menus(layout)
        .build()
}
