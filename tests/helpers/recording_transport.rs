//! In-memory transport recording every delivery in order

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use HappySmile::models::MessageHandle;
use HappySmile::services::Transport;
use HappySmile::state::{Markup, MenuKind};
use HappySmile::utils::errors::{HappySmileError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Sent { chat_id: i64, text: String, markup: Markup },
    Deleted(MessageHandle),
}

#[derive(Default)]
pub struct RecordingTransport {
    deliveries: Mutex<Vec<Delivery>>,
    next_message_id: AtomicI32,
    fail_deletes: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delete fail, as when the message is too old to delete
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
    }

    pub fn sent_count(&self) -> usize {
        self.deliveries()
            .iter()
            .filter(|d| matches!(d, Delivery::Sent { .. }))
            .count()
    }

    /// Text and markup of the most recent message sent
    pub fn last_sent(&self) -> Option<(String, Markup)> {
        self.deliveries().into_iter().rev().find_map(|d| match d {
            Delivery::Sent { text, markup, .. } => Some((text, markup)),
            Delivery::Deleted(_) => None,
        })
    }

    pub fn last_text(&self) -> String {
        self.last_sent().map(|(text, _)| text).unwrap_or_default()
    }

    /// Labels of the last menu sent, with its kind
    pub fn last_menu(&self) -> Option<(MenuKind, Vec<String>)> {
        match self.last_sent()?.1 {
            Markup::Menu(menu) => Some((
                menu.kind(),
                menu.labels().into_iter().map(String::from).collect(),
            )),
            _ => None,
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(&self, chat_id: i64, text: &str, markup: &Markup) -> Result<MessageHandle> {
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.deliveries.lock().unwrap().push(Delivery::Sent {
            chat_id,
            text: text.to_string(),
            markup: markup.clone(),
        });
        Ok(MessageHandle { chat_id, message_id })
    }

    async fn delete_message(&self, handle: MessageHandle) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(HappySmileError::InvalidInput("message can't be deleted".to_string()));
        }
        self.deliveries.lock().unwrap().push(Delivery::Deleted(handle));
        Ok(())
    }
}
