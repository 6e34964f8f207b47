//! State management module
//!
//! The conversation engine: per-chat session storage, declarative flows,
//! menus, flow composition and the dispatcher driving them.

pub mod composer;
pub mod context;
pub mod dispatcher;
pub mod flow;
pub mod matcher;
pub mod menu;
pub mod storage;

// Re-export commonly used state components
pub use composer::{FlowComposer, FlowRegistry, ParentLink, TerminalRemap};
pub use context::{FlowId, State, Step, Turn};
pub use dispatcher::{ConversationDispatcher, DispatchOutcome};
pub use flow::{handler, Binding, Flow, FlowBuilder, Handler, Reply, Route};
pub use matcher::Matcher;
pub use menu::{Markup, Menu, MenuContext, MenuKind, MenuLayout, MenuOption};
pub use storage::{SessionReporter, SessionStore, StoreStats, TurnGuard};
