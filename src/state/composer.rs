//! Flow composition
//!
//! Top-level flows are registered directly; nested flows are embedded into a
//! step of their parent together with a terminal remap. Composition errors are
//! detected once, when the registry is built.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::utils::errors::{FlowError, FlowResult};
use super::context::{FlowId, State, Step};
use super::flow::{Binding, Flow, Route};

/// Maps a nested flow's terminal steps to the parent steps that resume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalRemap(HashMap<Step, Step>);

impl TerminalRemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual remap: the child's end ends the parent as well
    pub fn end_to_end() -> Self {
        Self::new().map(Step::END, Step::END)
    }

    pub fn map(mut self, child: Step, parent: Step) -> Self {
        self.0.insert(child, parent);
        self
    }

    pub fn get(&self, child: Step) -> Option<Step> {
        self.0.get(&child).copied()
    }

    pub fn contains(&self, child: Step) -> bool {
        self.0.contains_key(&child)
    }

    fn iter(&self) -> impl Iterator<Item = (Step, Step)> + '_ {
        self.0.iter().map(|(child, parent)| (*child, *parent))
    }
}

/// Where a nested flow hangs in its parent
#[derive(Debug, Clone)]
pub struct ParentLink {
    pub parent: State,
    pub remap: TerminalRemap,
}

/// Collects flows and embeddings, then validates them into a [`FlowRegistry`]
#[derive(Default)]
pub struct FlowComposer {
    flows: Vec<Flow>,
    roots: Vec<FlowId>,
    links: Vec<(FlowId, ParentLink)>,
}

impl FlowComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level flow, started from idle by its entry points
    pub fn register(&mut self, flow: Flow) -> &mut Self {
        self.roots.push(flow.id());
        self.flows.push(flow);
        self
    }

    /// Embed `child` as a route of `parent_state`.
    ///
    /// While the parent is at that step, an event accepted by one of the
    /// child's entry points hands the conversation to the child until it
    /// reaches a step listed in `remap`.
    pub fn embed(&mut self, parent_state: State, child: Flow, remap: TerminalRemap) -> &mut Self {
        self.links.push((child.id(), ParentLink { parent: parent_state, remap }));
        self.flows.push(child);
        self
    }

    /// Validate the composition. Every error here is a startup failure.
    pub fn build(self) -> FlowResult<FlowRegistry> {
        let FlowComposer { flows, roots, links } = self;

        let mut by_id: HashMap<FlowId, Flow> = HashMap::new();
        for flow in flows {
            let id = flow.id();
            if by_id.insert(id, flow).is_some() {
                return Err(FlowError::DuplicateFlow { flow: id.to_string() });
            }
        }

        for (child, link) in &links {
            let parent = by_id.get_mut(&link.parent.flow).ok_or_else(|| FlowError::UnknownParent {
                flow: child.to_string(),
                parent: link.parent.flow.to_string(),
            })?;

            if !link.remap.contains(Step::END) {
                return Err(FlowError::MissingTerminalRemap { flow: child.to_string() });
            }

            for (_, target) in link.remap.iter() {
                if !target.is_end() && !parent.has_step(target) {
                    return Err(FlowError::UnknownRemapTarget {
                        flow: child.to_string(),
                        parent: link.parent.flow.to_string(),
                        step: target.value(),
                    });
                }
            }

            parent.push_route(link.parent.step, Route::Nested(*child));
            debug!(child = %child, parent = %link.parent, "Embedded nested flow");
        }

        let parents: HashMap<FlowId, ParentLink> = links.iter().cloned().collect();
        for (child, _) in &links {
            let mut seen = vec![*child];
            let mut cursor = *child;
            while let Some(link) = parents.get(&cursor) {
                cursor = link.parent.flow;
                if seen.contains(&cursor) {
                    return Err(FlowError::CyclicEmbedding { flow: child.to_string() });
                }
                seen.push(cursor);
            }
        }

        // A cancel command has to be reachable at every nesting depth
        for (child, _) in &links {
            let mut cursor = *child;
            loop {
                if by_id.get(&cursor).is_some_and(|flow| !flow.fallbacks().is_empty()) {
                    break;
                }
                match parents.get(&cursor) {
                    Some(link) => cursor = link.parent.flow,
                    None => return Err(FlowError::UnreachableEnd { flow: child.to_string() }),
                }
            }
        }

        check_entry_overlaps(&by_id, &roots)?;
        let mut scopes: HashMap<FlowId, Vec<FlowId>> = HashMap::new();
        for (child, link) in &links {
            scopes.entry(link.parent.flow).or_default().push(*child);
        }
        for siblings in scopes.values() {
            check_entry_overlaps(&by_id, siblings)?;
        }

        info!(flows = by_id.len(), roots = roots.len(), "Conversation flows composed");

        Ok(FlowRegistry {
            flows: by_id.into_iter().map(|(id, flow)| (id, Arc::new(flow))).collect(),
            roots,
            parents,
        })
    }
}

/// Reject entry points of different flows in one scope that can accept the same event
fn check_entry_overlaps(flows: &HashMap<FlowId, Flow>, scope: &[FlowId]) -> FlowResult<()> {
    for (i, a) in scope.iter().enumerate() {
        for b in &scope[i + 1..] {
            let (Some(flow_a), Some(flow_b)) = (flows.get(a), flows.get(b)) else {
                continue;
            };
            if let Some(binding) = first_overlap(flow_a.entry_points(), flow_b.entry_points()) {
                return Err(FlowError::OverlappingEntryPoints {
                    flow: b.to_string(),
                    other: a.to_string(),
                    matcher: binding.matcher.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn first_overlap<'a>(left: &[Binding], right: &'a [Binding]) -> Option<&'a Binding> {
    right
        .iter()
        .find(|r| left.iter().any(|l| l.matcher.overlaps(&r.matcher)))
}

/// Immutable, validated set of flows shared by the dispatcher
#[derive(Debug)]
pub struct FlowRegistry {
    flows: HashMap<FlowId, Arc<Flow>>,
    roots: Vec<FlowId>,
    parents: HashMap<FlowId, ParentLink>,
}

impl FlowRegistry {
    pub fn flow(&self, id: FlowId) -> Option<&Arc<Flow>> {
        self.flows.get(&id)
    }

    /// Top-level flows in registration order
    pub fn roots(&self) -> impl Iterator<Item = &Arc<Flow>> {
        self.roots.iter().filter_map(|id| self.flows.get(id))
    }

    pub fn parent(&self, id: FlowId) -> Option<&ParentLink> {
        self.parents.get(&id)
    }

    pub fn is_nested(&self, id: FlowId) -> bool {
        self.parents.contains_key(&id)
    }

    /// Resolve the state to store after `flow` returned `step`.
    ///
    /// Terminal steps of nested flows are remapped onto their parent, repeatedly,
    /// so an end several levels deep collapses in one pass. `None` means the
    /// top-level flow ended and the session entry must be cleared.
    pub fn settle(&self, flow: FlowId, step: Step) -> Option<State> {
        let mut current = State::new(flow, step);
        loop {
            match self.parents.get(&current.flow) {
                Some(link) => match link.remap.get(current.step) {
                    Some(parent_step) => current = State::new(link.parent.flow, parent_step),
                    None => return Some(current),
                },
                None if current.step.is_end() => return None,
                None => return Some(current),
            }
        }
    }
}
