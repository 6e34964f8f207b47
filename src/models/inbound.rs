//! Inbound event model
//!
//! Transport-neutral description of what a chat user sent: a text message or a
//! button tap carrying callback data.

use serde::{Deserialize, Serialize};

/// Who sent the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: i64,
    pub first_name: String,
}

/// Handle of a message previously delivered by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Plain message text, commands included
    Text(String),
    /// Button tap; `message` is the message the button was attached to
    Callback {
        data: String,
        message: Option<MessageHandle>,
    },
}

impl Payload {
    pub fn is_callback(&self) -> bool {
        matches!(self, Payload::Callback { .. })
    }

    /// Short description for logs.
    ///
    /// Free text may carry personal data such as an NRIC, so only commands are
    /// shown verbatim; other text is reduced to its length.
    pub fn describe(&self) -> String {
        match self {
            Payload::Text(text) if text.starts_with('/') => {
                let command = text.split_whitespace().next().unwrap_or(text);
                format!("command:{}", command)
            }
            Payload::Text(text) => format!("text:{} chars", text.chars().count()),
            Payload::Callback { data, .. } => format!("callback:{}", data),
        }
    }
}

/// One inbound event for one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Conversation identity
    pub chat_id: i64,
    pub sender: Option<Sender>,
    pub payload: Payload,
}

impl InboundEvent {
    pub fn text(chat_id: i64, sender: Option<Sender>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender,
            payload: Payload::Text(text.into()),
        }
    }

    pub fn callback(
        chat_id: i64,
        sender: Option<Sender>,
        data: impl Into<String>,
        message: Option<MessageHandle>,
    ) -> Self {
        Self {
            chat_id,
            sender,
            payload: Payload::Callback {
                data: data.into(),
                message,
            },
        }
    }

    pub fn is_callback(&self) -> bool {
        self.payload.is_callback()
    }
}
