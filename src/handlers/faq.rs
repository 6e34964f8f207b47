//! View FAQ: a fixed list of questions with canned answers.

use crate::state::{handler, Flow, FlowId, Matcher, Menu, MenuContext, Reply, Step, Turn};
use crate::utils::errors::Result;
use crate::utils::helpers::escape_markdown;
use super::common::{self, BACK, CLOSE};
use super::main_menu;

pub const FLOW: FlowId = FlowId::new("view_faq");

pub const START: Step = Step::new(0);
pub const CHOOSING: Step = Step::new(1);
pub const DISPLAY_ANSWER: Step = Step::new(2);
pub const CLOSE_TOKEN: Step = Step::new(3);

pub const UNKNOWN_ANSWER: &str = "Sorry, I'm not sure about this. Perhaps you can try emailing the clinic?";

/// Questions in display order
pub const FAQ: &[(&str, &str)] = &[
    (
        "What is HappySmile?",
        "We are a platform that links up dental clinics and patients. Clinics can join our platform to be exposed to customers on our platform. Patients on the other hand, can use our platform to find a suitable clinic within their vicinity.",
    ),
    (
        "Can I Get An MC (Medical Certificate) From You?",
        "Yes, most of the clinics should be able to issue MC. However, MCs are only provided to cover specific procedures. Please check with the clinic that you're visiting to confirm if they can do so.",
    ),
    (
        "Do You Accept CHAS Or Pioneer Generation Cards?",
        "Please check with the respective clinic that you will be visiting. Always remember to bring the original card along with you. You are entitled to a subsidy (fee reduction) according to the limits set by your card type. Do note that CHAS and Pioneer cards do not entitle you for free treatment.",
    ),
    (
        "Do You Accept Walk-In Patients?",
        "You can check the current queue status and make an appointment on the spot with a few clicks. You are however, required to be a registered user on our platform.",
    ),
    (
        "What Should I Bring On My First Appointment?",
        "Please bring your identification documents (NRIC, EP, Work Pass, passport), insurance policyholder cards/policy numbers, CHAS/Pioneer Generation cards (if applicable), insurance forms (if required), list of medication you are currently taking and the most recent copy of any previous dental x-rays. It is a good idea to email your x-rays to the clinic prior to your visit.",
    ),
    (
        "Can I Use My Medisave To Pay For My Dental Treatment?",
        "Yes, you may. However, Medisave only covers certain surgical treatments.",
    ),
];

pub fn answer(question: &str) -> Option<&'static str> {
    FAQ.iter().find(|(q, _)| *q == question).map(|(_, a)| *a)
}

fn layout(step: Step, _context: &MenuContext) -> Option<Menu> {
    match step {
        START => Some(Menu::reply(
            FAQ.iter().map(|(question, _)| *question).chain(std::iter::once(CLOSE)),
        )),
        DISPLAY_ANSWER => Some(Menu::inline([(BACK, START.token())])),
        _ => None,
    }
}

async fn start(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "Start");
    let menu = turn.menu(START, &MenuContext::empty());
    Ok(Reply::new(CHOOSING, "Pick an option:").with_markup(menu))
}

async fn display_answer(turn: Turn) -> Result<Reply> {
    common::log_step(&turn, "FAQ Answer");

    let text = turn
        .text()
        .and_then(answer)
        .unwrap_or(UNKNOWN_ANSWER);
    let menu = turn.menu(DISPLAY_ANSWER, &MenuContext::empty());
    Ok(Reply::new(DISPLAY_ANSWER, escape_markdown(text)).with_markup(menu))
}

pub fn flow() -> Flow {
    Flow::builder(FLOW, "VIEW FAQ")
        .entry(Matcher::callback(main_menu::VIEW_FAQ.token()), handler(start))
        .on(CHOOSING, Matcher::text(CLOSE), handler(common::end))
        .on(CHOOSING, Matcher::any_text(), handler(display_answer))
        .on(DISPLAY_ANSWER, Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(START.token()), handler(start))
        .fallback(Matcher::callback(CLOSE_TOKEN.token()), handler(common::end))
        .fallback(Matcher::command("stop"), handler(common::end))
        .menus(layout)
        .build()
}
