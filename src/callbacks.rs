use crate::errors::{BotError, GatewayError};
use crate::models::{Rating, WeekId};
use crate::state::AppState;
use crate::telegram::{CallbackQuery, ChatTarget, Notice, OutgoingMessage};
use crate::ui;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

const WEEK_PREFIX: &str = "settimana_";
const RPE_PREFIX: &str = "rpe_";

/// What an inline button asks for, decoded from its callback token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    FullReport,
    PrivateReport,
    WeekList,
    WeekDetail(WeekId),
    /// `settimana_<digits>` that names no storable week: out of range or
    /// zero-padded. Keeps the digits as sent.
    UnknownWeek(String),
    RpeSubmit(Rating),
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interaction::FullReport => f.write_str("resoconto"),
            Interaction::PrivateReport => f.write_str("resoconto_privato"),
            Interaction::WeekList => f.write_str("settimane"),
            Interaction::WeekDetail(week) => write!(f, "{WEEK_PREFIX}{week}"),
            Interaction::UnknownWeek(digits) => write!(f, "{WEEK_PREFIX}{digits}"),
            Interaction::RpeSubmit(rating) => write!(f, "{RPE_PREFIX}{rating}"),
        }
    }
}

fn digits(s: &str) -> Option<&str> {
    (!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())).then_some(s)
}

impl FromStr for Interaction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resoconto" => return Ok(Interaction::FullReport),
            "resoconto_privato" => return Ok(Interaction::PrivateReport),
            "settimane" => return Ok(Interaction::WeekList),
            _ => {}
        }

        if let Some(week) = s.strip_prefix(WEEK_PREFIX).and_then(digits) {
            return Ok(match week.parse::<WeekId>() {
                Ok(id) if id.to_string() == week => Interaction::WeekDetail(id),
                _ => Interaction::UnknownWeek(week.to_string()),
            });
        }
        if let Some(rating) = s.strip_prefix(RPE_PREFIX).and_then(digits) {
            return rating
                .parse::<u8>()
                .ok()
                .and_then(Rating::new)
                .map(Interaction::RpeSubmit)
                .ok_or(());
        }
        Err(())
    }
}

pub async fn handle_callback(state: &AppState, query: CallbackQuery) -> Result<(), BotError> {
    let Some(interaction) = query.data.as_deref().and_then(|data| data.parse::<Interaction>().ok()) else {
        debug!(data = ?query.data, "ignoring unknown callback");
        return Ok(());
    };
    info!(user_id = query.from.id, %interaction, "handling button press");

    match interaction {
        Interaction::FullReport => full_report(state, &query).await,
        Interaction::PrivateReport => private_report(state, &query).await,
        Interaction::WeekList => week_list(state, &query).await,
        Interaction::WeekDetail(week) => week_detail(state, &query, Some(week)).await,
        Interaction::UnknownWeek(_) => week_detail(state, &query, None).await,
        Interaction::RpeSubmit(rating) => rpe_submit(state, &query, rating).await,
    }
}

async fn ack(state: &AppState, query: &CallbackQuery) -> Result<(), BotError> {
    state.gateway.answer_callback(&query.id, None).await?;
    Ok(())
}

async fn replace_message(
    state: &AppState,
    query: &CallbackQuery,
    message: &OutgoingMessage,
) -> Result<(), BotError> {
    let Some(origin) = &query.message else {
        warn!(callback_id = %query.id, "callback without an editable message");
        return Ok(());
    };
    state
        .gateway
        .edit_message(origin.chat.id, origin.message_id, message)
        .await?;
    Ok(())
}

async fn full_report(state: &AppState, query: &CallbackQuery) -> Result<(), BotError> {
    ack(state, query).await?;
    let stats = state.storage.load_stats().await?;
    replace_message(state, query, &ui::report(&stats)).await
}

async fn private_report(state: &AppState, query: &CallbackQuery) -> Result<(), BotError> {
    state
        .gateway
        .answer_callback(&query.id, Some(&Notice::alert(ui::CHECK_PRIVATE_MESSAGES)))
        .await?;

    let stats = state.storage.load_stats().await?;
    let report = ui::report(&stats);
    match state.gateway.send_message(&ChatTarget::Id(query.from.id), &report).await {
        Ok(()) => Ok(()),
        Err(GatewayError::Unreachable { description }) => {
            info!(user_id = query.from.id, %description, "user has no private chat, posting fallback");
            let Some(origin) = &query.message else {
                warn!(callback_id = %query.id, "no chat to post the private report fallback in");
                return Ok(());
            };
            let username = state.gateway.bot_username().await?;
            state
                .gateway
                .send_message(
                    &ChatTarget::Id(origin.chat.id),
                    &ui::private_report_fallback(&username),
                )
                .await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn week_list(state: &AppState, query: &CallbackQuery) -> Result<(), BotError> {
    ack(state, query).await?;
    let stats = state.storage.load_stats().await?;
    replace_message(state, query, &ui::week_list(&stats)).await
}

/// `None` is a token that cannot name a stored week.
async fn week_detail(state: &AppState, query: &CallbackQuery, week: Option<WeekId>) -> Result<(), BotError> {
    ack(state, query).await?;
    let Some(week) = week else {
        return replace_message(state, query, &OutgoingMessage::plain(ui::WEEK_NOT_AVAILABLE)).await;
    };
    let stats = state.storage.load_stats().await?;
    replace_message(state, query, &ui::week_detail(week, stats.get(week))).await
}

async fn rpe_submit(state: &AppState, query: &CallbackQuery, rating: Rating) -> Result<(), BotError> {
    state
        .gateway
        .answer_callback(&query.id, Some(&Notice::alert(ui::RPE_RECORDED)))
        .await?;

    let admin = ChatTarget::Id(state.config.admin_id);
    state
        .gateway
        .send_message(&admin, &ui::rpe_submitted(&query.from.first_name, rating))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fixed_tokens() {
        assert_eq!("resoconto".parse::<Interaction>(), Ok(Interaction::FullReport));
        assert_eq!("resoconto_privato".parse::<Interaction>(), Ok(Interaction::PrivateReport));
        assert_eq!("settimane".parse::<Interaction>(), Ok(Interaction::WeekList));
    }

    #[test]
    fn decodes_week_and_rating_tokens() {
        assert_eq!("settimana_12".parse::<Interaction>(), Ok(Interaction::WeekDetail(WeekId(12))));
        assert_eq!("settimana_0".parse::<Interaction>(), Ok(Interaction::WeekDetail(WeekId(0))));
        assert_eq!(
            "rpe_10".parse::<Interaction>(),
            Ok(Interaction::RpeSubmit(Rating::new(10).unwrap()))
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in [
            "",
            "resoconto ",
            "settimana_",
            "settimana_+3",
            "settimana_-1",
            "settimana_x",
            "rpe_0",
            "rpe_11",
            "rpe_",
            "rpe_5a",
        ] {
            assert_eq!(token.parse::<Interaction>(), Err(()), "{token:?}");
        }
    }

    #[test]
    fn non_canonical_week_digits_name_no_week() {
        for digits in ["4294967296", "99999999999999999999", "007", "00"] {
            assert_eq!(
                format!("settimana_{digits}").parse::<Interaction>(),
                Ok(Interaction::UnknownWeek(digits.to_string())),
                "{digits:?}"
            );
        }
        assert_eq!(
            "settimana_4294967295".parse::<Interaction>(),
            Ok(Interaction::WeekDetail(WeekId(u32::MAX)))
        );
    }

    #[test]
    fn encoding_matches_decoding() {
        let interactions = [
            Interaction::FullReport,
            Interaction::PrivateReport,
            Interaction::WeekList,
            Interaction::WeekDetail(WeekId(7)),
            Interaction::UnknownWeek("007".to_string()),
            Interaction::RpeSubmit(Rating::new(3).unwrap()),
        ];
        for interaction in interactions {
            assert_eq!(interaction.to_string().parse::<Interaction>(), Ok(interaction));
        }
    }
}
