use crate::errors::GatewayError;
use crate::telegram::{ChatTarget, InlineKeyboardMarkup, Notice, OutgoingMessage, ParseMode, User};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Outbound side of the messaging platform.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_message(&self, chat: &ChatTarget, message: &OutgoingMessage) -> Result<(), GatewayError>;

    /// Replaces the text (and keyboard) of a message the bot sent earlier.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), GatewayError>;

    async fn answer_callback(&self, callback_id: &str, notice: Option<&Notice>) -> Result<(), GatewayError>;

    async fn bot_username(&self) -> Result<String, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a ChatTarget,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct EditMessageText<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    show_alert: bool,
}

#[derive(Serialize)]
struct SetWebhook<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct NoParams {}

/// Maps a failed Bot API call to an error, singling out unreachable recipients.
pub fn classify_failure(code: u16, description: String) -> GatewayError {
    let lowered = description.to_lowercase();
    if code == 403 || (code == 400 && lowered.contains("chat not found")) {
        GatewayError::Unreachable { description }
    } else {
        GatewayError::Api { code, description }
    }
}

/// Bot API client over HTTPS.
#[derive(Clone)]
pub struct BotApi {
    client: Client,
    base_url: String,
    token: String,
}

impl BotApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, GatewayError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method, "calling Bot API");
        let response = self.client.post(self.method_url(method)).json(params).send().await?;
        let status = response.status();
        let body: ApiResponse<T> = response.json().await?;

        if body.ok {
            return body.result.ok_or_else(|| GatewayError::Api {
                code: status.as_u16(),
                description: format!("{method} returned no result"),
            });
        }

        let code = body.error_code.unwrap_or(status.as_u16());
        let description = body.description.unwrap_or_else(|| status.to_string());
        Err(classify_failure(code, description))
    }

    /// Points Telegram at `<url>` for update delivery.
    pub async fn set_webhook(&self, url: &str) -> Result<(), GatewayError> {
        let _: bool = self.call("setWebhook", &SetWebhook { url }).await?;
        Ok(())
    }
}

#[async_trait]
impl Gateway for BotApi {
    async fn send_message(&self, chat: &ChatTarget, message: &OutgoingMessage) -> Result<(), GatewayError> {
        let params = SendMessage {
            chat_id: chat,
            text: &message.text,
            parse_mode: message.parse_mode,
            reply_markup: message.reply_markup.as_ref(),
        };
        let _: serde_json::Value = self.call("sendMessage", &params).await?;
        Ok(())
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), GatewayError> {
        let params = EditMessageText {
            chat_id,
            message_id,
            text: &message.text,
            parse_mode: message.parse_mode,
            reply_markup: message.reply_markup.as_ref(),
        };
        let _: serde_json::Value = self.call("editMessageText", &params).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, notice: Option<&Notice>) -> Result<(), GatewayError> {
        let params = AnswerCallbackQuery {
            callback_query_id: callback_id,
            text: notice.map(|notice| notice.text.as_str()),
            show_alert: notice.is_some_and(|notice| notice.show_alert),
        };
        let _: bool = self.call("answerCallbackQuery", &params).await?;
        Ok(())
    }

    async fn bot_username(&self) -> Result<String, GatewayError> {
        let me: User = self.call("getMe", &NoParams {}).await?;
        me.username.ok_or(GatewayError::MissingUsername)
    }
}
