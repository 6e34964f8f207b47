//! Test helpers module
//!
//! Utilities shared by the integration tests: a recording transport, a
//! scripted backend, fixtures and a harness wiring them to the real flows.

#![allow(dead_code)]

pub mod recording_transport;
pub mod stub_backend;
pub mod test_data;

pub use recording_transport::*;
pub use stub_backend::*;
pub use test_data::*;

use std::sync::Arc;

use HappySmile::config::Settings;
use HappySmile::models::InboundEvent;
use HappySmile::services::{ClinicBackend, ServiceFactory};
use HappySmile::state::{ConversationDispatcher, DispatchOutcome, FlowRegistry, SessionStore, State};
use HappySmile::build_registry;

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = "123456:TEST".to_string();
    settings
}

/// The assistant's flows wired to in-memory collaborators
pub struct TestBot {
    pub dispatcher: ConversationDispatcher,
    pub transport: Arc<RecordingTransport>,
}

impl TestBot {
    pub fn new(backend: impl ClinicBackend + 'static) -> Self {
        let registry = build_registry().expect("flows should compose");
        Self::with_registry(registry, Arc::new(backend))
    }

    pub fn with_registry(registry: FlowRegistry, backend: Arc<dyn ClinicBackend>) -> Self {
        let transport = Arc::new(RecordingTransport::new());
        let services = ServiceFactory::with_backend(test_settings(), backend);
        let dispatcher = ConversationDispatcher::new(
            Arc::new(registry),
            SessionStore::new(),
            transport.clone(),
            Arc::new(services),
        );
        Self { dispatcher, transport }
    }

    pub async fn dispatch(&self, event: InboundEvent) -> DispatchOutcome {
        self.dispatcher.dispatch(event).await.expect("dispatch should succeed")
    }

    pub async fn send(&self, chat_id: i64, message: &str) -> DispatchOutcome {
        self.dispatch(text(chat_id, message)).await
    }

    /// Tap a button on the last message sent to the chat
    pub async fn tap(&self, chat_id: i64, data: &str) -> DispatchOutcome {
        let message_id = self.transport.sent_count() as i32;
        self.dispatch(tap(chat_id, data, message_id)).await
    }

    pub fn state(&self, chat_id: i64) -> Option<State> {
        self.dispatcher.store().get(chat_id)
    }
}
