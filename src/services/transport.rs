//! Chat transport
//!
//! The dispatcher only needs to send a message with optional markup and to
//! delete one it sent earlier. [`TelegramTransport`] renders menus as Telegram
//! keyboards and sends everything as MarkdownV2.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    KeyboardRemove, Message, MessageId, ParseMode, ReplyMarkup,
};
use tracing::debug;

use crate::models::inbound::{InboundEvent, MessageHandle, Sender};
use crate::state::menu::{Markup, Menu, MenuKind};
use crate::utils::errors::Result;

/// Outbound side of the chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str, markup: &Markup) -> Result<MessageHandle>;

    async fn delete_message(&self, handle: MessageHandle) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_message(&self, chat_id: i64, text: &str, markup: &Markup) -> Result<MessageHandle> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(reply_markup) = render_markup(markup) {
            request = request.reply_markup(reply_markup);
        }

        let sent = request.await?;
        debug!(chat_id = chat_id, message_id = sent.id.0, "Message sent");

        Ok(MessageHandle {
            chat_id: sent.chat.id.0,
            message_id: sent.id.0,
        })
    }

    async fn delete_message(&self, handle: MessageHandle) -> Result<()> {
        self.bot
            .delete_message(ChatId(handle.chat_id), MessageId(handle.message_id))
            .await?;
        debug!(chat_id = handle.chat_id, message_id = handle.message_id, "Message deleted");
        Ok(())
    }
}

/// Telegram markup for a [`Markup`]; one option per row
pub fn render_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::RemoveKeyboard => Some(KeyboardRemove::new().into()),
        Markup::Menu(menu) => Some(render_menu(menu)),
    }
}

fn render_menu(menu: &Menu) -> ReplyMarkup {
    match menu.kind() {
        MenuKind::Reply => KeyboardMarkup::new(
            menu.options()
                .iter()
                .map(|option| vec![KeyboardButton::new(option.label.clone())]),
        )
        .one_time_keyboard()
        .into(),
        MenuKind::Inline => InlineKeyboardMarkup::new(menu.options().iter().map(|option| {
            vec![InlineKeyboardButton::callback(option.label.clone(), option.payload.clone())]
        }))
        .into(),
    }
}

/// Inbound event for a text message; `None` for messages without text
pub fn event_from_message(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;
    let sender = msg.from.as_ref().map(|user| Sender {
        id: user.id.0 as i64,
        first_name: user.first_name.clone(),
    });
    Some(InboundEvent::text(msg.chat.id.0, sender, text))
}

/// Inbound event for a button tap; `None` without data or an originating chat
pub fn event_from_callback(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.clone()?;
    let message = query.message.as_ref().map(|m| MessageHandle {
        chat_id: m.chat().id.0,
        message_id: m.id().0,
    });
    let chat_id = message.map(|m| m.chat_id)?;
    let sender = Sender {
        id: query.from.id.0 as i64,
        first_name: query.from.first_name.clone(),
    };
    Some(InboundEvent::callback(chat_id, Some(sender), data, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inbound::Payload;

    #[test]
    fn test_reply_menu_renders_one_time_keyboard() {
        let markup = Markup::from(Menu::reply(["List All Clinics", "❌ Close"]));
        match render_markup(&markup) {
            Some(ReplyMarkup::Keyboard(keyboard)) => {
                assert_eq!(keyboard.keyboard.len(), 2);
                assert_eq!(keyboard.keyboard[1][0].text, "❌ Close");
            }
            other => panic!("unexpected markup: {:?}", other),
        }
    }

    #[test]
    fn test_inline_menu_renders_callback_buttons() {
        let markup = Markup::from(Menu::inline([("Find a clinic", "2"), ("View FAQ", "4")]));
        match render_markup(&markup) {
            Some(ReplyMarkup::InlineKeyboard(inline)) => {
                assert_eq!(inline.inline_keyboard.len(), 2);
                assert_eq!(inline.inline_keyboard[0][0].text, "Find a clinic");
            }
            other => panic!("unexpected markup: {:?}", other),
        }
    }

    #[test]
    fn test_callback_event_is_keyed_by_chat_not_user() {
        let query: CallbackQuery = serde_json::from_value(serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": {"id": 111, "is_bot": false, "first_name": "Mei"},
            "message": {
                "message_id": 7,
                "date": 1700000000,
                "chat": {"id": -222, "type": "group", "title": "Clinic staff"},
                "text": "Pick an option:"
            },
            "chat_instance": "-8177734400001",
            "data": "2"
        }))
        .unwrap();

        let event = event_from_callback(&query).unwrap();
        assert_eq!(event.chat_id, -222);
        assert_eq!(event.sender.map(|s| s.id), Some(111));
        assert_eq!(
            event.payload,
            Payload::Callback {
                data: "2".to_string(),
                message: Some(MessageHandle { chat_id: -222, message_id: 7 }),
            }
        );
    }

    #[test]
    fn test_plain_and_remove_markup() {
        assert!(render_markup(&Markup::None).is_none());
        assert!(matches!(
            render_markup(&Markup::RemoveKeyboard),
            Some(ReplyMarkup::KeyboardRemove(_))
        ));
    }
}
