use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a training week. Kept numeric so ordering is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekId(pub u32);

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WeekId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(WeekId)
    }
}

/// Hours and minutes with the minutes always kept below 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrainingTime {
    hours: u32,
    minutes: u32,
}

impl TrainingTime {
    /// Builds a time from raw parts, carrying minute overflow into hours.
    pub fn from_parts(hours: u32, minutes: u32) -> Self {
        Self::from_total_minutes(u64::from(hours) * 60 + u64::from(minutes))
    }

    fn from_total_minutes(total: u64) -> Self {
        let hours = u32::try_from(total / 60).unwrap_or(u32::MAX);
        Self {
            hours,
            minutes: (total % 60) as u32,
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_minutes(&self) -> u64 {
        u64::from(self.hours) * 60 + u64::from(self.minutes)
    }

    pub fn saturating_add(self, other: TrainingTime) -> Self {
        Self::from_total_minutes(self.total_minutes().saturating_add(other.total_minutes()))
    }
}

impl fmt::Display for TrainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time '{0}', expected H:M")]
pub struct InvalidTime(pub String);

impl FromStr for TrainingTime {
    type Err = InvalidTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTime(s.to_string());
        let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
        let hours = hours.trim().parse::<u32>().map_err(|_| invalid())?;
        let minutes = minutes.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::from_parts(hours, minutes))
    }
}

impl TryFrom<String> for TrainingTime {
    type Error = InvalidTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TrainingTime> for String {
    fn from(value: TrainingTime) -> Self {
        value.to_string()
    }
}

/// Accumulated totals for one week, stored as `{"km": .., "ore": "HH:MM"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeeklyRecord {
    pub km: f64,
    pub ore: TrainingTime,
}

/// Contents of `settimane.json`, ordered by numeric week id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct StatsStore {
    pub weeks: BTreeMap<WeekId, WeeklyRecord>,
}

impl StatsStore {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn get(&self, week: WeekId) -> Option<&WeeklyRecord> {
        self.weeks.get(&week)
    }
}

/// A perceived-exertion score between 1 and 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
