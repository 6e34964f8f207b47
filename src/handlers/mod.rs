//! Bot handlers module
//!
//! One module per conversation flow:
//! - `main_menu` - the top-level flow started by `/start`
//! - `appointments`, `find_clinic`, `clinic_queue`, `faq` - flows nested
//!   under the main menu's action selection

pub mod appointments;
pub mod clinic_queue;
pub mod common;
pub mod faq;
pub mod find_clinic;
pub mod main_menu;

use crate::state::{FlowComposer, FlowRegistry, State, TerminalRemap};
use crate::utils::errors::FlowResult;

/// Compose every flow of the assistant.
///
/// Each action flow ends the whole conversation when it ends.
pub fn build_registry() -> FlowResult<FlowRegistry> {
    let selecting = State::new(main_menu::FLOW, main_menu::SELECTING_ACTION);

    let mut composer = FlowComposer::new();
    composer
        .register(main_menu::flow())
        .embed(selecting, appointments::flow()?, TerminalRemap::end_to_end())
        .embed(selecting, find_clinic::flow()?, TerminalRemap::end_to_end())
        .embed(selecting, clinic_queue::flow()?, TerminalRemap::end_to_end())
        .embed(selecting, faq::flow(), TerminalRemap::end_to_end());

    composer.build()
}
