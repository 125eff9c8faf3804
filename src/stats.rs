use crate::models::{StatsStore, TrainingTime, WeekId, WeeklyRecord};
use thiserror::Error;

/// Increment requested by `/aggiorna_settimana`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekUpdate {
    pub week: WeekId,
    pub km: f64,
    pub time: TrainingTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateArgsError {
    #[error("expected 3 arguments, got {0}")]
    WrongCount(usize),

    #[error("invalid {field}: {value:?}")]
    Invalid { field: &'static str, value: String },

    #[error("distance total for week {0} would overflow")]
    TotalOverflow(WeekId),
}

impl WeekUpdate {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, UpdateArgsError> {
        let [week, km, time] = args else {
            return Err(UpdateArgsError::WrongCount(args.len()));
        };
        let (week, km, time) = (week.as_ref(), km.as_ref(), time.as_ref());
        let invalid = |field: &'static str, value: &str| UpdateArgsError::Invalid {
            field,
            value: value.to_string(),
        };

        let week = week.parse::<WeekId>().map_err(|_| invalid("week", week))?;
        let km = km
            .parse::<f64>()
            .ok()
            .filter(|km| km.is_finite() && *km >= 0.0)
            .ok_or_else(|| invalid("km", km))?;
        let time = time.parse::<TrainingTime>().map_err(|_| invalid("time", time))?;

        Ok(Self { week, km, time })
    }
}

/// Adds the update to its week, creating the week at zero if needed.
/// Returns the week's new totals; the store is left untouched when the
/// distance total would stop being a finite number.
pub fn apply_update(stats: &mut StatsStore, update: &WeekUpdate) -> Result<WeeklyRecord, UpdateArgsError> {
    let current = stats.get(update.week).cloned().unwrap_or_default();
    let km = current.km + update.km;
    if !km.is_finite() {
        return Err(UpdateArgsError::TotalOverflow(update.week));
    }

    let record = WeeklyRecord {
        km,
        ore: current.ore.saturating_add(update.time),
    };
    stats.weeks.insert(update.week, record.clone());
    Ok(record)
}
