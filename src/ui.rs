use crate::callbacks::Interaction;
use crate::models::{Rating, StatsStore, WeekId, WeeklyRecord};
use crate::stats::WeekUpdate;
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup, OutgoingMessage};

pub const USAGE: &str = "Usa il formato: /aggiorna_settimana [settimana] [km] [hh:mm]";
pub const INVALID_FORMAT: &str = "Formato non valido. Es: /aggiorna_settimana 2 3.5 00:25";
pub const NO_DATA: &str = "Nessun dato disponibile al momento.";
pub const NO_WEEKS: &str = "Nessuna settimana disponibile.";
pub const WEEK_NOT_AVAILABLE: &str = "Dati non disponibili.";
pub const ANNOUNCEMENT_SENT: &str = "Allenamento del giorno inviato al canale.";
pub const CHECK_PRIVATE_MESSAGES: &str = "Controlla i messaggi privati del bot.";
pub const RPE_RECORDED: &str = "RPE registrato. Grazie!";

fn button(text: impl Into<String>, interaction: Interaction) -> InlineKeyboardButton {
    InlineKeyboardButton {
        text: text.into(),
        callback_data: interaction.to_string(),
    }
}

pub fn bot_link(bot_username: &str) -> String {
    format!("https://t.me/{bot_username}")
}

/// Escapes the characters legacy Markdown treats as markup.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Kilometres as typed back to the admin: always at least one decimal.
pub fn format_km_delta(km: f64) -> String {
    if km.fract() == 0.0 {
        format!("{km:.1}")
    } else {
        km.to_string()
    }
}

pub fn start_menu(is_admin: bool, bot_username: &str) -> OutgoingMessage {
    let buttons = if is_admin {
        vec![
            button("📊 Resoconto completo", Interaction::FullReport),
            button("📅 Settimane", Interaction::WeekList),
        ]
    } else {
        vec![button("📊 Resoconto allenamenti", Interaction::PrivateReport)]
    };

    OutgoingMessage::markdown(format!(
        "Benvenuto! Per ricevere messaggi privati dal bot, avvialo qui:\n[Avvia il bot]({})",
        bot_link(bot_username)
    ))
    .with_keyboard(InlineKeyboardMarkup::column(buttons))
}

pub fn week_updated(update: &WeekUpdate) -> OutgoingMessage {
    OutgoingMessage::plain(format!(
        "Aggiornata settimana {}: +{} km, +{} ore",
        update.week,
        format_km_delta(update.km),
        update.time
    ))
}

pub fn rpe_prompt() -> OutgoingMessage {
    let buttons = Rating::all().map(|rating| button(rating.to_string(), Interaction::RpeSubmit(rating)));
    OutgoingMessage::markdown("📅 *Allenamento oggi*\n\nSeleziona il tuo RPE:")
        .with_keyboard(InlineKeyboardMarkup::column(buttons))
}

/// Every week in ascending order, or the no-data text when empty.
pub fn report(stats: &StatsStore) -> OutgoingMessage {
    if stats.is_empty() {
        return OutgoingMessage::plain(NO_DATA);
    }

    let mut text = String::from("📊 *Resoconto allenamenti*\n\n");
    for (week, record) in &stats.weeks {
        text.push_str(&format!(
            "Settimana {week}: Distanza = {:.1}KM /\nTempo = {}\n",
            record.km, record.ore
        ));
    }
    OutgoingMessage::markdown(text)
}

pub fn private_report_fallback(bot_username: &str) -> OutgoingMessage {
    OutgoingMessage::markdown(format!(
        "⚠️ Per ricevere il resoconto in privato, avvia prima il bot: [Avvia il bot]({})",
        bot_link(bot_username)
    ))
}

pub fn week_list(stats: &StatsStore) -> OutgoingMessage {
    if stats.is_empty() {
        return OutgoingMessage::plain(NO_WEEKS);
    }

    let buttons = stats
        .weeks
        .keys()
        .map(|week| button(format!("Settimana {week}"), Interaction::WeekDetail(*week)));
    OutgoingMessage::plain("📅 Seleziona una settimana:").with_keyboard(InlineKeyboardMarkup::column(buttons))
}

pub fn week_detail(week: WeekId, record: Option<&WeeklyRecord>) -> OutgoingMessage {
    match record {
        Some(record) => OutgoingMessage::markdown(format!(
            "📅 *Settimana {week}*\nKm totali: {:.1}\nOre totali: {}",
            record.km, record.ore
        )),
        None => OutgoingMessage::plain(WEEK_NOT_AVAILABLE),
    }
}

pub fn rpe_submitted(first_name: &str, rating: Rating) -> OutgoingMessage {
    OutgoingMessage::markdown(format!(
        "💬 {} ha selezionato RPE: *{rating}*",
        escape_markdown(first_name)
    ))
}
