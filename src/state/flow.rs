//! Flow definitions
//!
//! A flow is a declarative table: entry points that start it from idle, an
//! ordered route list per step, flow-level fallbacks and an optional menu
//! layout. Handlers produce a [`Reply`] carrying the next step; the dispatcher
//! owns every state change.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::utils::errors::Result;
use super::context::{FlowId, Step, Turn};
use super::matcher::Matcher;
use super::menu::{Markup, MenuLayout};

/// Outcome of a handler: where to go next and what to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub next: Step,
    pub text: String,
    pub markup: Markup,
}

impl Reply {
    pub fn new(next: Step, text: impl Into<String>) -> Self {
        Self {
            next,
            text: text.into(),
            markup: Markup::None,
        }
    }

    pub fn with_markup(mut self, markup: impl Into<Markup>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn remove_keyboard(mut self) -> Self {
        self.markup = Markup::RemoveKeyboard;
        self
    }
}

/// Type-erased async handler
pub type Handler = Arc<dyn Fn(Turn) -> BoxFuture<'static, Result<Reply>> + Send + Sync>;

/// Wrap an async function as a [`Handler`]
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Turn) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    Arc::new(move |turn| Box::pin(f(turn)))
}

/// A matcher bound to the handler it selects
#[derive(Clone)]
pub struct Binding {
    pub matcher: Matcher,
    pub handler: Handler,
}

/// One candidate in a step's route list
#[derive(Clone)]
pub enum Route {
    Handle(Binding),
    /// Hand over to a nested flow when one of its entry points accepts
    Nested(FlowId),
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Handle(binding) => write!(f, "Handle({})", binding.matcher),
            Route::Nested(flow) => write!(f, "Nested({})", flow),
        }
    }
}

pub struct Flow {
    id: FlowId,
    name: &'static str,
    entry_points: Vec<Binding>,
    states: HashMap<Step, Vec<Route>>,
    fallbacks: Vec<Binding>,
    layout: Option<MenuLayout>,
}

impl Flow {
    pub fn builder(id: FlowId, name: &'static str) -> FlowBuilder {
        FlowBuilder {
            flow: Flow {
                id,
                name,
                entry_points: Vec::new(),
                states: HashMap::new(),
                fallbacks: Vec::new(),
                layout: None,
            },
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entry_points(&self) -> &[Binding] {
        &self.entry_points
    }

    pub fn fallbacks(&self) -> &[Binding] {
        &self.fallbacks
    }

    pub fn layout(&self) -> Option<MenuLayout> {
        self.layout
    }

    /// Routes declared for `step`, in declaration order
    pub fn routes(&self, step: Step) -> &[Route] {
        self.states.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_step(&self, step: Step) -> bool {
        self.states.contains_key(&step)
    }

    /// Candidates for `step`: the step's routes followed by the fallbacks
    pub fn candidates(&self, step: Step) -> impl Iterator<Item = Route> + '_ {
        self.routes(step)
            .iter()
            .cloned()
            .chain(self.fallbacks.iter().cloned().map(Route::Handle))
    }

    pub(crate) fn push_route(&mut self, step: Step, route: Route) {
        self.states.entry(step).or_default().push(route);
    }
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("entry_points", &self.entry_points.len())
            .field("states", &self.states.len())
            .field("fallbacks", &self.fallbacks.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Flow`]; routes keep the order they are added in
pub struct FlowBuilder {
    flow: Flow,
}

impl FlowBuilder {
    pub fn entry(mut self, matcher: Matcher, handler: Handler) -> Self {
        self.flow.entry_points.push(Binding { matcher, handler });
        self
    }

    pub fn on(mut self, step: Step, matcher: Matcher, handler: Handler) -> Self {
        self.flow.push_route(step, Route::Handle(Binding { matcher, handler }));
        self
    }

    /// Declare a step with no routes of its own yet, e.g. one that only hosts nested flows
    pub fn step(mut self, step: Step) -> Self {
        self.flow.states.entry(step).or_default();
        self
    }

    pub fn fallback(mut self, matcher: Matcher, handler: Handler) -> Self {
        self.flow.fallbacks.push(Binding { matcher, handler });
        self
    }

    pub fn menus(mut self, layout: MenuLayout) -> Self {
        self.flow.layout = Some(layout);
        self
    }

    pub fn build(self) -> Flow {
        self.flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: FlowId = FlowId::new("demo");
    const ASKING: Step = Step::new(1);

    async fn noop(_turn: Turn) -> Result<Reply> {
        Ok(Reply::new(ASKING, "noop"))
    }

    fn describe(route: &Route) -> String {
        match route {
            Route::Handle(binding) => binding.matcher.to_string(),
            Route::Nested(flow) => format!("nested({})", flow),
        }
    }

    #[test]
    fn test_candidates_keep_declaration_order_then_fallbacks() {
        let flow = Flow::builder(DEMO, "Demo")
            .on(ASKING, Matcher::text("⬅️Back"), handler(noop))
            .on(ASKING, Matcher::any_text(), handler(noop))
            .fallback(Matcher::command("stop"), handler(noop))
            .build();

        let order: Vec<String> = flow.candidates(ASKING).map(|r| describe(&r)).collect();
        assert_eq!(order, vec!["text(⬅️Back)", "any_text", "command(/stop)"]);
    }

    #[test]
    fn test_unknown_step_falls_back() {
        let flow = Flow::builder(DEMO, "Demo")
            .fallback(Matcher::command("stop"), handler(noop))
            .build();

        assert!(flow.routes(Step::new(7)).is_empty());
        let order: Vec<String> = flow.candidates(Step::new(7)).map(|r| describe(&r)).collect();
        assert_eq!(order, vec!["command(/stop)"]);
    }

    #[test]
    fn test_reply_builders() {
        let reply = Reply::new(Step::END, "bye").remove_keyboard();
        assert_eq!(reply.markup, Markup::RemoveKeyboard);
        assert_eq!(reply.next, Step::END);
    }
}
