//! Conversation dispatcher
//!
//! Routes one inbound event per call. With no stored state the top-level
//! flows' entry points are scanned in registration order. Otherwise the owning
//! flow's routes for the current step are tried in order, nested flows
//! contributing their entry points where they are embedded, then the flow's
//! fallbacks, then the fallbacks of each enclosing flow outwards. The first
//! accepting matcher wins; if none accepts the event is dropped and the state
//! is left untouched.
//!
//! The handler's next step is settled through the registry, so terminal steps
//! of nested flows resume the parent and the top-level end clears the session.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::models::inbound::{InboundEvent, Payload};
use crate::services::{ServiceFactory, Transport};
use crate::utils::errors::Result;
use crate::utils::logging::{log_dropped_event, log_transition, log_transport_error};
use super::composer::FlowRegistry;
use super::context::{FlowId, State, Step, Turn};
use super::flow::{Binding, Flow, Reply, Route};
use super::storage::SessionStore;

/// What happened to an inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No matcher accepted the event
    Ignored,
    /// A handler ran; `to` is `None` when the conversation ended
    Handled { from: Option<State>, to: Option<State> },
}

pub struct ConversationDispatcher {
    registry: Arc<FlowRegistry>,
    store: SessionStore,
    transport: Arc<dyn Transport>,
    services: Arc<ServiceFactory>,
}

impl ConversationDispatcher {
    pub fn new(
        registry: Arc<FlowRegistry>,
        store: SessionStore,
        transport: Arc<dyn Transport>,
        services: Arc<ServiceFactory>,
    ) -> Self {
        Self {
            registry,
            store,
            transport,
            services,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    /// Process one event to completion.
    ///
    /// Events of the same conversation are serialized for the whole turn.
    /// Delivery failures are logged, never returned; only a failing handler
    /// yields an error, and then the stored state is unchanged.
    #[instrument(skip(self, event), fields(chat_id = event.chat_id))]
    pub async fn dispatch(&self, event: InboundEvent) -> Result<DispatchOutcome> {
        let chat_id = event.chat_id;
        let _turn_lock = self.store.lock(chat_id).await;

        let current = self.store.get(chat_id);
        let Some((flow, binding)) = self.resolve(current, &event.payload) else {
            let state = current.map(|s| s.to_string());
            log_dropped_event(chat_id, state.as_deref(), &event.payload.describe());
            if let Some(stale) = current.filter(|s| self.registry.flow(s.flow).is_none()) {
                self.store.clear(chat_id);
                debug!(chat_id = chat_id, state = %stale, "Cleared state of unknown flow");
            }
            return Ok(DispatchOutcome::Ignored);
        };

        let flow_id = flow.id();
        let turn = Turn::new(event.clone(), flow, self.services.clone());
        let reply = (binding.handler)(turn).await?;

        let next = self.registry.settle(flow_id, reply.next);
        match next {
            Some(state) => self.store.set(chat_id, state),
            None => {
                self.store.clear(chat_id);
            }
        }
        let (from, to) = (current.map(|s| s.to_string()), next.map(|s| s.to_string()));
        log_transition(chat_id, from.as_deref(), to.as_deref());

        self.deliver(&event, &reply).await;

        Ok(DispatchOutcome::Handled { from: current, to: next })
    }

    /// Select the flow and binding that handle `payload` in `current`
    fn resolve(&self, current: Option<State>, payload: &Payload) -> Option<(Arc<Flow>, Binding)> {
        if let Some(state) = current {
            match self.registry.flow(state.flow) {
                Some(flow) => return self.resolve_in_flow(flow, state.step, payload),
                None => warn!(state = %state, "Stored state belongs to an unknown flow, treating as idle"),
            }
        }

        self.registry
            .roots()
            .find_map(|flow| entry_match(flow, payload).map(|binding| (flow.clone(), binding)))
    }

    fn resolve_in_flow(&self, flow: &Arc<Flow>, step: Step, payload: &Payload) -> Option<(Arc<Flow>, Binding)> {
        for route in flow.candidates(step) {
            match route {
                Route::Handle(binding) if binding.matcher.accepts(payload) => {
                    return Some((flow.clone(), binding));
                }
                Route::Handle(_) => {}
                Route::Nested(child_id) => {
                    let Some(child) = self.registry.flow(child_id) else {
                        continue;
                    };
                    if let Some(binding) = entry_match(child, payload) {
                        return Some((child.clone(), binding));
                    }
                }
            }
        }
        self.resolve_in_ancestors(flow.id(), payload)
    }

    /// Fallbacks of the enclosing flows, innermost first.
    ///
    /// The selected handler runs in the ancestor, so the nested flows below it
    /// are abandoned once its step is settled.
    fn resolve_in_ancestors(&self, flow: FlowId, payload: &Payload) -> Option<(Arc<Flow>, Binding)> {
        let mut cursor = flow;
        while let Some(link) = self.registry.parent(cursor) {
            let ancestor = self.registry.flow(link.parent.flow)?;
            let accepted = ancestor
                .fallbacks()
                .iter()
                .find(|binding| binding.matcher.accepts(payload));
            if let Some(binding) = accepted {
                return Some((ancestor.clone(), binding.clone()));
            }
            cursor = link.parent.flow;
        }
        None
    }

    /// Replace the tapped message for callbacks, append a new one for text
    async fn deliver(&self, event: &InboundEvent, reply: &Reply) {
        let chat_id = event.chat_id;

        if let Payload::Callback { message: Some(handle), .. } = &event.payload {
            if let Err(e) = self.transport.delete_message(*handle).await {
                log_transport_error("delete_message", chat_id, &e.to_string());
            }
        }

        if let Err(e) = self.transport.send_message(chat_id, &reply.text, &reply.markup).await {
            log_transport_error("send_message", chat_id, &e.to_string());
        }
    }
}

fn entry_match(flow: &Flow, payload: &Payload) -> Option<Binding> {
    flow.entry_points()
        .iter()
        .find(|binding| binding.matcher.accepts(payload))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{
        Appointment, AppointmentSummary, Clinic, ClinicSummary, MessageHandle, QueueCount,
    };
    use crate::services::ClinicBackend;
    use crate::state::composer::FlowComposer;
    use crate::state::flow::handler;
    use crate::state::matcher::Matcher;
    use crate::state::menu::Markup;
    use crate::utils::errors::{BackendError, BackendResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const ROOT: FlowId = FlowId::new("root");
    const ASKING: Step = Step::new(1);

    struct NoBackend;

    #[async_trait]
    impl ClinicBackend for NoBackend {
        async fn list_clinics(&self, _postal: Option<&str>) -> BackendResult<Vec<ClinicSummary>> {
            Err(BackendError::ServiceUnavailable)
        }
        async fn get_clinic(&self, _id: &str) -> BackendResult<Clinic> {
            Err(BackendError::ServiceUnavailable)
        }
        async fn upcoming_appointments(&self, _nric: &str) -> BackendResult<Vec<AppointmentSummary>> {
            Err(BackendError::ServiceUnavailable)
        }
        async fn get_appointment(&self, _id: &str) -> BackendResult<Appointment> {
            Err(BackendError::ServiceUnavailable)
        }
        async fn queue_count(&self, _id: &str) -> BackendResult<QueueCount> {
            Err(BackendError::ServiceUnavailable)
        }
    }

    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    #[async_trait]
    impl Transport for Log {
        async fn send_message(&self, chat_id: i64, text: &str, _markup: &Markup) -> Result<MessageHandle> {
            self.0.lock().unwrap().push(format!("send:{}", text));
            Ok(MessageHandle { chat_id, message_id: 1 })
        }
        async fn delete_message(&self, handle: MessageHandle) -> Result<()> {
            self.0.lock().unwrap().push(format!("delete:{}", handle.message_id));
            Ok(())
        }
    }

    async fn ask(_turn: Turn) -> Result<Reply> {
        Ok(Reply::new(ASKING, "asking"))
    }

    async fn first(_turn: Turn) -> Result<Reply> {
        Ok(Reply::new(ASKING, "first"))
    }

    async fn second(_turn: Turn) -> Result<Reply> {
        Ok(Reply::new(ASKING, "second"))
    }

    async fn done(_turn: Turn) -> Result<Reply> {
        Ok(Reply::new(Step::END, "done"))
    }

    fn dispatcher(log: Arc<Log>) -> ConversationDispatcher {
        let flow = Flow::builder(ROOT, "Root")
            .entry(Matcher::command("go"), handler(ask))
            .on(ASKING, Matcher::text("hello"), handler(first))
            .on(ASKING, Matcher::any_text(), handler(second))
            .fallback(Matcher::command("stop"), handler(done))
            .build();
        let mut composer = FlowComposer::new();
        composer.register(flow);
        let registry = composer.build().unwrap();
        let services = ServiceFactory::with_backend(Settings::default(), Arc::new(NoBackend));

        ConversationDispatcher::new(Arc::new(registry), SessionStore::new(), log, Arc::new(services))
    }

    #[tokio::test]
    async fn test_first_accepting_matcher_wins() {
        let log = Arc::new(Log::default());
        let dispatcher = dispatcher(log.clone());

        dispatcher.dispatch(InboundEvent::text(1, None, "/go")).await.unwrap();
        dispatcher.dispatch(InboundEvent::text(1, None, "hello")).await.unwrap();
        dispatcher.dispatch(InboundEvent::text(1, None, "anything")).await.unwrap();

        let sent = log.0.lock().unwrap().clone();
        assert_eq!(sent, vec!["send:asking", "send:first", "send:second"]);
    }

    #[tokio::test]
    async fn test_idle_only_scans_entry_points() {
        let dispatcher = dispatcher(Arc::new(Log::default()));

        let outcome = dispatcher.dispatch(InboundEvent::text(1, None, "hello")).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert_eq!(dispatcher.store().get(1), None);
    }

    #[tokio::test]
    async fn test_top_level_end_clears_session() {
        let dispatcher = dispatcher(Arc::new(Log::default()));
        dispatcher.dispatch(InboundEvent::text(1, None, "/go")).await.unwrap();

        let outcome = dispatcher.dispatch(InboundEvent::text(1, None, "/stop")).await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Handled { from: Some(State::new(ROOT, ASKING)), to: None }
        );
        assert!(dispatcher.store().is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_callback_is_silent() {
        let log = Arc::new(Log::default());
        let dispatcher = dispatcher(log.clone());
        dispatcher.dispatch(InboundEvent::text(1, None, "/go")).await.unwrap();

        let handle = MessageHandle { chat_id: 1, message_id: 9 };
        let outcome = dispatcher
            .dispatch(InboundEvent::callback(1, None, "x", Some(handle)))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert_eq!(log.0.lock().unwrap().len(), 1);
    }
}
