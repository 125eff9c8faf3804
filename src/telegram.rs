//! The subset of Bot API types the bot sends and receives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Destination of an outgoing message: a numeric chat id or a public `@username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatTarget {
    Id(i64),
    Username(String),
}

impl FromStr for ChatTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(ChatTarget::Id(id));
        }
        if s.len() > 1 && s.starts_with('@') {
            return Ok(ChatTarget::Username(s.to_string()));
        }
        Err(format!("not a chat id or @username: {s}"))
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTarget::Id(id) => write!(f, "{id}"),
            ChatTarget::Username(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|button| vec![button]).collect(),
        }
    }
}

/// Text plus optional formatting and keyboard, shared by send and edit calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl OutgoingMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            parse_mode: Some(ParseMode::Markdown),
            ..Self::plain(text)
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

/// Pop-up shown when answering a button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub show_alert: bool,
}

impl Notice {
    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            show_alert: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_callback_update() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 9,
            "callback_query": {
                "id": "cb-1",
                "from": { "id": 5, "is_bot": false, "first_name": "Giulia" },
                "chat_instance": "x",
                "data": "rpe_7",
                "message": {
                    "message_id": 77,
                    "date": 0,
                    "chat": { "id": -100, "type": "channel" }
                }
            }
        }))
        .unwrap();

        assert!(update.message.is_none());
        let query = update.callback_query.unwrap();
        assert_eq!(query.from.first_name, "Giulia");
        assert_eq!(query.data.as_deref(), Some("rpe_7"));
        assert_eq!(query.message.unwrap().chat.id, -100);
    }

    #[test]
    fn chat_target_parses_ids_and_usernames() {
        assert_eq!("-100123".parse::<ChatTarget>().unwrap(), ChatTarget::Id(-100123));
        assert_eq!(
            "@canale".parse::<ChatTarget>().unwrap(),
            ChatTarget::Username("@canale".to_string())
        );
        assert!("canale".parse::<ChatTarget>().is_err());
        assert!("@".parse::<ChatTarget>().is_err());
    }

    #[test]
    fn chat_target_serializes_untagged() {
        assert_eq!(serde_json::to_value(ChatTarget::Id(3)).unwrap(), serde_json::json!(3));
        assert_eq!(
            serde_json::to_value(ChatTarget::Username("@c".into())).unwrap(),
            serde_json::json!("@c")
        );
    }
}
