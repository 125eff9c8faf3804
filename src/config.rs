use crate::telegram::ChatTarget;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Settings read once at startup and shared read-only by every handler.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub admin_id: i64,
    pub channel: ChatTarget,
    pub data_dir: PathBuf,
    pub port: u16,
    pub api_url: String,
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| value(name).ok_or(ConfigError::Missing(name));

        let bot_token = required("BOT_TOKEN")?;
        if bot_token.contains('/') {
            return Err(ConfigError::Invalid {
                name: "BOT_TOKEN",
                value: bot_token,
            });
        }

        let admin_raw = required("ADMIN_ID")?;
        let admin_id = admin_raw.parse::<i64>().map_err(|_| ConfigError::Invalid {
            name: "ADMIN_ID",
            value: admin_raw.clone(),
        })?;

        let channel_raw = required("CHANNEL_ID")?;
        let channel = channel_raw.parse::<ChatTarget>().map_err(|_| ConfigError::Invalid {
            name: "CHANNEL_ID",
            value: channel_raw.clone(),
        })?;

        let port = match value("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let data_dir = value("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let api_url = value("TELEGRAM_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let webhook_url = value("WEBHOOK_URL").map(|url| url.trim_end_matches('/').to_string());

        Ok(Self {
            bot_token,
            admin_id,
            channel,
            data_dir,
            port,
            api_url,
            webhook_url,
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.admin_id
    }

    /// Path the webhook is served on; derived from the token.
    pub fn webhook_path(&self) -> String {
        format!("/{}", self.bot_token)
    }
}
