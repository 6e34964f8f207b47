//! Session storage
//!
//! In-memory map from conversation id to its current [`State`]. An absent entry
//! means the conversation is idle. A per-conversation lock serializes whole
//! dispatch turns, so two events of one chat never interleave while events of
//! different chats run concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use super::context::State;

/// Thread-safe session store; clones share the same sessions
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<i64, State>>,
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a conversation, `None` when idle
    pub fn get(&self, chat_id: i64) -> Option<State> {
        self.sessions.get(&chat_id).map(|entry| *entry.value())
    }

    pub fn set(&self, chat_id: i64, state: State) {
        debug!(chat_id = chat_id, state = %state, "Saving session state");
        self.sessions.insert(chat_id, state);
    }

    /// Remove a conversation's state; returns whether there was one
    pub fn clear(&self, chat_id: i64) -> bool {
        let removed = self.sessions.remove(&chat_id).is_some();
        if removed {
            debug!(chat_id = chat_id, "Cleared session state");
        }
        removed
    }

    /// Acquire the turn lock of a conversation.
    ///
    /// The guard must be held from reading the state until the new state is
    /// written. Dropping the last guard of a conversation releases its lock entry.
    pub async fn lock(&self, chat_id: i64) -> TurnGuard {
        let lock = self
            .locks
            .entry(chat_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        TurnGuard {
            chat_id,
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
        }
    }

    /// Number of conversations holding or waiting for a turn lock
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot of active sessions grouped by flow
    pub fn stats(&self) -> StoreStats {
        let mut per_flow: HashMap<String, usize> = HashMap::new();
        for entry in self.sessions.iter() {
            *per_flow.entry(entry.value().flow.to_string()).or_insert(0) += 1;
        }

        StoreStats {
            active_sessions: self.sessions.len(),
            per_flow,
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

/// Turn lock of one conversation, held for a whole dispatch turn
pub struct TurnGuard {
    chat_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Only the map still references the mutex when nobody waits for it
        self.locks
            .remove_if(&self.chat_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl std::fmt::Debug for TurnGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnGuard").field("chat_id", &self.chat_id).finish()
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub active_sessions: usize,
    pub per_flow: HashMap<String, usize>,
}

/// Background task logging [`StoreStats`] periodically; stops when dropped
#[derive(Debug)]
pub struct SessionReporter {
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl SessionReporter {
    /// Start reporting every `interval`. A zero interval disables reporting.
    pub fn start(store: SessionStore, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!("Session statistics reporting is disabled");
            return Self { handle: None };
        }

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let stats = store.stats();
                info!(
                    active_sessions = stats.active_sessions,
                    per_flow = ?stats.per_flow,
                    "Session statistics"
                );
            }
        });

        info!("Started session statistics task with interval {:?}", interval);
        Self { handle: Some(handle) }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Stopped session statistics task");
        }
    }
}

impl Drop for SessionReporter {
    fn drop(&mut self) {
        self.stop();
    }
}
