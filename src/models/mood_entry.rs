use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Opaque store identifier. Higher numeric value = created later.
///
/// Ids are kept as strings because the store owns their format; recency is
/// only defined when both sides parse as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strict recency comparison. Non-numeric or equal ids are never newer,
    /// so the caller keeps whatever it saw first.
    pub fn is_newer_than(&self, other: &EntryId) -> bool {
        matches!(self.recency_cmp(other), Some(Ordering::Greater))
    }

    fn recency_cmp(&self, other: &EntryId) -> Option<Ordering> {
        let (a, b) = (self.0.trim(), other.0.trim());
        if let (Ok(a), Ok(b)) = (a.parse::<i128>(), b.parse::<i128>()) {
            return Some(a.cmp(&b));
        }
        let a = a.parse::<f64>().ok().filter(|v| v.is_finite())?;
        let b = b.parse::<f64>().ok().filter(|v| v.is_finite())?;
        a.partial_cmp(&b)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryDataError {
    #[error("unknown mood label: {0:?}")]
    UnknownMood(String),

    #[error("unknown sleep range label: {0:?}")]
    UnknownSleepRange(String),
}

/// Five-point mood scale. Label, ordinal and parsing all derive from
/// [`Mood::ALL`] and the two `match`es below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mood {
    VerySad,
    Sad,
    Neutral,
    Happy,
    VeryHappy,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::VerySad,
        Mood::Sad,
        Mood::Neutral,
        Mood::Happy,
        Mood::VeryHappy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::VerySad => "Very Sad",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Happy => "Happy",
            Mood::VeryHappy => "Very Happy",
        }
    }

    pub fn ordinal(self) -> i8 {
        match self {
            Mood::VerySad => -2,
            Mood::Sad => -1,
            Mood::Neutral => 0,
            Mood::Happy => 1,
            Mood::VeryHappy => 2,
        }
    }

    pub fn from_ordinal(value: i8) -> Option<Mood> {
        Self::ALL.into_iter().find(|m| m.ordinal() == value)
    }

    /// Rounds half away from zero, then clamps to the scale.
    pub fn from_average(average: f64) -> Mood {
        let rounded = average.round().clamp(-2.0, 2.0) as i8;
        Self::from_ordinal(rounded).unwrap_or(Mood::Neutral)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = EntryDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| EntryDataError::UnknownMood(s.to_string()))
    }
}

impl TryFrom<String> for Mood {
    type Error = EntryDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        mood.label().to_string()
    }
}

/// Bucketed hours of sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SleepRange {
    ZeroToTwo,
    ThreeToFour,
    FiveToSix,
    SevenToEight,
    NinePlus,
}

impl SleepRange {
    pub const ALL: [SleepRange; 5] = [
        SleepRange::ZeroToTwo,
        SleepRange::ThreeToFour,
        SleepRange::FiveToSix,
        SleepRange::SevenToEight,
        SleepRange::NinePlus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SleepRange::ZeroToTwo => "0-2 hours",
            SleepRange::ThreeToFour => "3-4 hours",
            SleepRange::FiveToSix => "5-6 hours",
            SleepRange::SevenToEight => "7-8 hours",
            SleepRange::NinePlus => "9+ hours",
        }
    }

    /// Representative hours used for averaging.
    pub fn midpoint(self) -> f64 {
        match self {
            SleepRange::ZeroToTwo => 1.0,
            SleepRange::ThreeToFour => 3.5,
            SleepRange::FiveToSix => 5.5,
            SleepRange::SevenToEight => 7.5,
            SleepRange::NinePlus => 9.0,
        }
    }
}

impl fmt::Display for SleepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SleepRange {
    type Err = EntryDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| EntryDataError::UnknownSleepRange(s.to_string()))
    }
}

impl TryFrom<String> for SleepRange {
    type Error = EntryDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SleepRange> for String {
    fn from(range: SleepRange) -> Self {
        range.label().to_string()
    }
}

/// One journal record, already scoped to a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub mood: Mood,
    #[serde(default)]
    pub feelings: Vec<String>,
    #[serde(default)]
    pub reflection: String,
    pub sleep_range: SleepRange,
}

/// Entry content submitted for upsert; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoodEntry {
    pub date: NaiveDate,
    pub mood: Mood,
    pub feelings: Vec<String>,
    pub reflection: String,
    pub sleep_range: SleepRange,
}

impl NewMoodEntry {
    pub fn into_entry(self, id: EntryId) -> MoodEntry {
        MoodEntry {
            id,
            date: self.date,
            mood: self.mood,
            feelings: self.feelings,
            reflection: self.reflection,
            sleep_range: self.sleep_range,
        }
    }
}

/// Raw `mood_entries` row. Labels stay as text so one bad row cannot fail a
/// whole load.
#[derive(Debug, Clone, FromRow)]
pub struct MoodEntryRow {
    pub id: i64,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub mood: String,
    pub feelings: Vec<String>,
    pub reflection: Option<String>,
    pub sleep_range: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MoodEntryRow> for MoodEntry {
    type Error = EntryDataError;

    fn try_from(row: MoodEntryRow) -> Result<Self, Self::Error> {
        Ok(MoodEntry {
            id: EntryId::from(row.id),
            date: row.entry_date,
            mood: row.mood.parse()?,
            feelings: row.feelings,
            reflection: row.reflection.unwrap_or_default(),
            sleep_range: row.sleep_range.parse()?,
        })
    }
}
