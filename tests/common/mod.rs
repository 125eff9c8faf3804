#![allow(dead_code)]

use async_trait::async_trait;
use rpe_bot::errors::GatewayError;
use rpe_bot::telegram::{ChatTarget, Notice, OutgoingMessage};
use rpe_bot::{AppState, Config, Gateway};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "123456:test-token";
pub const ADMIN_ID: i64 = 1000;
pub const CHANNEL: &str = "@allenamenti";
pub const BOT_USERNAME: &str = "corsa_bot";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send {
        chat: ChatTarget,
        message: OutgoingMessage,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        message: OutgoingMessage,
    },
    Answer {
        callback_id: String,
        notice: Option<Notice>,
    },
}

/// Records every outbound call instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    unreachable: Mutex<HashSet<i64>>,
    failing: Mutex<HashSet<i64>>,
}

impl RecordingGateway {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<(ChatTarget, OutgoingMessage)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send { chat, message } => Some((chat, message)),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<OutgoingMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Edit { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Direct messages to `chat_id` fail as if the user never started the bot.
    pub fn make_unreachable(&self, chat_id: i64) {
        self.unreachable.lock().unwrap().insert(chat_id);
    }

    /// Direct messages to `chat_id` fail with a generic API error.
    pub fn make_failing(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn send_message(&self, chat: &ChatTarget, message: &OutgoingMessage) -> Result<(), GatewayError> {
        if let ChatTarget::Id(id) = chat {
            if self.unreachable.lock().unwrap().contains(id) {
                return Err(GatewayError::Unreachable {
                    description: "Forbidden: bot can't initiate conversation with a user".into(),
                });
            }
            if self.failing.lock().unwrap().contains(id) {
                return Err(GatewayError::Api {
                    code: 500,
                    description: "Internal Server Error".into(),
                });
            }
        }
        self.calls.lock().unwrap().push(Call::Send {
            chat: chat.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(Call::Edit {
            chat_id,
            message_id,
            message: message.clone(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, notice: Option<&Notice>) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(Call::Answer {
            callback_id: callback_id.to_string(),
            notice: notice.cloned(),
        });
        Ok(())
    }

    async fn bot_username(&self) -> Result<String, GatewayError> {
        Ok(BOT_USERNAME.to_string())
    }
}

pub struct Harness {
    pub state: AppState,
    pub gateway: Arc<RecordingGateway>,
    pub dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = Config::from_lookup(|key| match key {
            "BOT_TOKEN" => Some(TOKEN.to_string()),
            "ADMIN_ID" => Some(ADMIN_ID.to_string()),
            "CHANNEL_ID" => Some(CHANNEL.to_string()),
            "APP_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
        .expect("config");
        let gateway = Arc::new(RecordingGateway::default());
        let state = AppState::new(config, gateway.clone());
        Self { state, gateway, dir }
    }

    pub fn weeks_path(&self) -> std::path::PathBuf {
        self.dir.path().join("settimane.json")
    }
}

pub fn command_update(user_id: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "date": 0,
            "chat": { "id": user_id, "type": "private" },
            "from": { "id": user_id, "is_bot": false, "first_name": "Utente" },
            "text": text
        }
    })
}

pub fn callback_update(user_id: i64, first_name: &str, chat_id: i64, data: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": 2,
        "callback_query": {
            "id": "cb-1",
            "chat_instance": "ci",
            "from": { "id": user_id, "is_bot": false, "first_name": first_name },
            "message": {
                "message_id": 55,
                "date": 0,
                "chat": { "id": chat_id, "type": "supergroup" }
            },
            "data": data
        }
    })
}
