use crate::errors::BotError;
use crate::state::AppState;
use crate::stats::{apply_update, UpdateArgsError, WeekUpdate};
use crate::telegram::{ChatTarget, Message, OutgoingMessage};
use crate::ui;
use tracing::{debug, info};

/// A slash command addressed to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    UpdateWeek(Vec<String>),
    AnnounceTraining,
}

impl Command {
    /// Decodes `/name[@bot] args...`; anything else yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next()?.strip_prefix('/')?;
        let name = head.split_once('@').map_or(head, |(name, _)| name);
        let args = tokens.map(str::to_string).collect::<Vec<_>>();

        match name {
            "start" => Some(Command::Start),
            "aggiorna_settimana" => Some(Command::UpdateWeek(args)),
            "allenamento_oggi" => Some(Command::AnnounceTraining),
            _ => None,
        }
    }
}

pub async fn handle_message(state: &AppState, message: Message) -> Result<(), BotError> {
    let Some(command) = message.text.as_deref().and_then(Command::parse) else {
        debug!(chat_id = message.chat.id, "ignoring non-command message");
        return Ok(());
    };
    let Some(sender) = &message.from else {
        debug!(chat_id = message.chat.id, "ignoring command without sender");
        return Ok(());
    };
    let is_admin = state.config.is_admin(sender.id);
    info!(user_id = sender.id, ?command, "handling command");

    match command {
        Command::Start => start(state, &message, is_admin).await,
        Command::UpdateWeek(_) | Command::AnnounceTraining if !is_admin => {
            debug!(user_id = sender.id, "ignoring admin command from non-admin");
            Ok(())
        }
        Command::UpdateWeek(args) => update_week(state, &message, &args).await,
        Command::AnnounceTraining => announce_training(state, &message).await,
    }
}

async fn start(state: &AppState, message: &Message, is_admin: bool) -> Result<(), BotError> {
    let username = state.gateway.bot_username().await?;
    state
        .gateway
        .send_message(&ChatTarget::Id(message.chat.id), &ui::start_menu(is_admin, &username))
        .await?;
    Ok(())
}

async fn update_week(state: &AppState, message: &Message, args: &[String]) -> Result<(), BotError> {
    let chat = ChatTarget::Id(message.chat.id);
    let update = match WeekUpdate::parse(args) {
        Ok(update) => update,
        Err(err) => return reject_update(state, &chat, err).await,
    };

    let mut stats = state.storage.load_stats().await?;
    let totals = match apply_update(&mut stats, &update) {
        Ok(totals) => totals,
        Err(err) => return reject_update(state, &chat, err).await,
    };
    state.storage.save_stats(&stats).await?;
    info!(week = %update.week, km = totals.km, ore = %totals.ore, "week updated");

    state.gateway.send_message(&chat, &ui::week_updated(&update)).await?;
    Ok(())
}

async fn reject_update(state: &AppState, chat: &ChatTarget, err: UpdateArgsError) -> Result<(), BotError> {
    debug!(%err, "rejecting week update");
    let reply = match err {
        UpdateArgsError::WrongCount(_) => ui::USAGE,
        UpdateArgsError::Invalid { .. } | UpdateArgsError::TotalOverflow(_) => ui::INVALID_FORMAT,
    };
    state
        .gateway
        .send_message(chat, &OutgoingMessage::plain(reply))
        .await?;
    Ok(())
}

async fn announce_training(state: &AppState, message: &Message) -> Result<(), BotError> {
    state
        .gateway
        .send_message(&state.config.channel, &ui::rpe_prompt())
        .await?;
    info!(channel = %state.config.channel, "RPE prompt broadcast");

    state
        .gateway
        .send_message(
            &ChatTarget::Id(message.chat.id),
            &OutgoingMessage::plain(ui::ANNOUNCEMENT_SENT),
        )
        .await?;
    Ok(())
}
