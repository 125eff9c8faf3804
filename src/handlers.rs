use crate::callbacks::handle_callback;
use crate::commands::handle_message;
use crate::errors::{AppError, BotError};
use crate::state::AppState;
use crate::telegram::Update;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error};

pub async fn health() -> &'static str {
    "OK"
}

/// Receives updates on `/<bot token>`; any other path is a 404.
pub async fn webhook(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    Json(update): Json<Update>,
) -> Result<StatusCode, AppError> {
    if secret != state.config.bot_token {
        return Err(AppError::not_found());
    }

    let update_id = update.update_id;
    if let Err(err) = dispatch(&state, update).await {
        error!(update_id, "update handling failed: {err}");
    }
    Ok(StatusCode::OK)
}

/// Routes one update to its command or button handler.
pub async fn dispatch(state: &AppState, update: Update) -> Result<(), BotError> {
    if let Some(message) = update.message {
        return handle_message(state, message).await;
    }
    if let Some(query) = update.callback_query {
        return handle_callback(state, query).await;
    }
    debug!(update_id = update.update_id, "ignoring unsupported update");
    Ok(())
}
