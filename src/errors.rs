use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned to the HTTP caller of the webhook router.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "not found".to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The user never opened a private chat with the bot, or blocked it.
    #[error("recipient unreachable: {description}")]
    Unreachable { description: String },

    #[error("Bot API error {code}: {description}")]
    Api { code: u16, description: String },

    #[error("bot account has no username")]
    MissingUsername,

    #[error("Bot API transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure of a command or interaction handler.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
