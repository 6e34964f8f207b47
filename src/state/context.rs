//! Conversation state identifiers and per-turn handler context
//!
//! A [`State`] is a step scoped to the flow that defined it. Handlers receive a
//! [`Turn`] describing the inbound event and the services they may call, and
//! never touch the session store themselves.

use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::models::inbound::{InboundEvent, Payload};
use crate::services::{ClinicBackend, ServiceFactory};
use super::flow::Flow;
use super::menu::{self, Menu, MenuContext};

/// Identifier of a flow; doubles as the namespace of its steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowId(&'static str);

impl FlowId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A point within one flow's state space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Step(i16);

impl Step {
    /// Reserved terminal step shared by every flow
    pub const END: Step = Step(-1);

    pub const fn new(value: i16) -> Self {
        Self(value)
    }

    pub fn value(self) -> i16 {
        self.0
    }

    pub fn is_end(self) -> bool {
        self == Self::END
    }

    /// Callback token correlated with this step
    pub fn token(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            f.write_str("END")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The value stored per conversation: a step and the flow owning it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub flow: FlowId,
    pub step: Step,
}

impl State {
    pub const fn new(flow: FlowId, step: Step) -> Self {
        Self { flow, step }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.flow, self.step)
    }
}

/// Everything a handler may look at while processing one inbound event
#[derive(Clone)]
pub struct Turn {
    pub event: InboundEvent,
    pub services: Arc<ServiceFactory>,
    flow: Arc<Flow>,
}

impl Turn {
    pub fn new(event: InboundEvent, flow: Arc<Flow>, services: Arc<ServiceFactory>) -> Self {
        Self { event, services, flow }
    }

    /// Text of a plain message, `None` for button taps
    pub fn text(&self) -> Option<&str> {
        match &self.event.payload {
            Payload::Text(text) => Some(text.as_str()),
            Payload::Callback { .. } => None,
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.event.chat_id
    }

    pub fn user_id(&self) -> i64 {
        self.event.sender.as_ref().map(|s| s.id).unwrap_or(self.event.chat_id)
    }

    pub fn first_name(&self) -> &str {
        self.event
            .sender
            .as_ref()
            .map(|s| s.first_name.as_str())
            .unwrap_or("there")
    }

    /// Human-readable name of the flow this turn runs in
    pub fn process(&self) -> &'static str {
        self.flow.name()
    }

    pub fn flow_id(&self) -> FlowId {
        self.flow.id()
    }

    pub fn backend(&self) -> &dyn ClinicBackend {
        self.services.backend.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.services.settings
    }

    /// Build the active flow's menu for `step`
    pub fn menu(&self, step: Step, context: &MenuContext) -> Option<Menu> {
        menu::build(&self.flow, step, context)
    }
}
