//! Bounded recent-history series for the mood/sleep chart.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::mood_entry::{EntryId, Mood, MoodEntry, SleepRange};
use crate::services::canonical::canonicalize;

pub const TREND_WINDOW: usize = 11;

/// Charts with fewer points than this switch to a spread-out layout.
pub const SPARSE_BELOW: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub id: EntryId,
    pub date: NaiveDate,
    pub mood: Mood,
    pub mood_value: i8,
    pub sleep_range: SleepRange,
    pub sleep_hours: f64,
    pub feelings: Vec<String>,
    pub reflection: String,
}

impl From<&MoodEntry> for TrendPoint {
    fn from(entry: &MoodEntry) -> Self {
        Self {
            id: entry.id.clone(),
            date: entry.date,
            mood: entry.mood,
            mood_value: entry.mood.ordinal(),
            sleep_range: entry.sleep_range,
            sleep_hours: entry.sleep_range.midpoint(),
            feelings: entry.feelings.clone(),
            reflection: entry.reflection.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendWindow {
    pub count: usize,
    pub is_sparse: bool,
    pub points: Vec<TrendPoint>,
}

/// Last [`TREND_WINDOW`] distinct days, oldest first. Accepts raw or
/// canonical input; no padding when fewer days exist.
pub fn build_trend_window(entries: &[MoodEntry]) -> TrendWindow {
    let canonical = canonicalize(entries);
    let start = canonical.len().saturating_sub(TREND_WINDOW);
    let points: Vec<TrendPoint> = canonical[start..].iter().map(TrendPoint::from).collect();
    TrendWindow {
        count: points.len(),
        is_sparse: points.len() < SPARSE_BELOW,
        points,
    }
}
