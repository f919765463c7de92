//! Rolling mood/sleep averages over the last five check-ins, compared with
//! the five before them.

use serde::Serialize;

use crate::models::mood_entry::{Mood, MoodEntry};

pub const ROLLING_WINDOW: usize = 5;

/// Below this many canonical entries there is no summary at all. A single
/// entry already produces an average of itself.
pub const MIN_ENTRIES_FOR_SUMMARY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increase,
    Decrease,
    Same,
}

impl TrendDirection {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            TrendDirection::Increase
        } else if delta < 0.0 {
            TrendDirection::Decrease
        } else {
            TrendDirection::Same
        }
    }
}

/// `last` is the final five entries, `prev` the (up to) five before them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Windows<'a> {
    pub last: &'a [MoodEntry],
    pub prev: &'a [MoodEntry],
}

pub fn split_windows(entries: &[MoodEntry]) -> Windows<'_> {
    let last_start = entries.len().saturating_sub(ROLLING_WINDOW);
    let prev_start = last_start.saturating_sub(ROLLING_WINDOW);
    Windows {
        last: &entries[last_start..],
        prev: &entries[prev_start..last_start],
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}

/// Mean ordinal mood (-2..=2); `None` for an empty group.
pub fn mood_average(group: &[MoodEntry]) -> Option<f64> {
    mean(group.iter().map(|e| f64::from(e.mood.ordinal())))
}

/// Mean sleep midpoint in hours; `None` for an empty group.
pub fn sleep_average(group: &[MoodEntry]) -> Option<f64> {
    mean(group.iter().map(|e| e.sleep_range.midpoint()))
}

/// `current - previous`, or 0 when there is nothing to compare against.
pub fn trend_delta(current: Option<f64>, previous: Option<f64>) -> f64 {
    match (current, previous) {
        (Some(c), Some(p)) => c - p,
        _ => 0.0,
    }
}

/// One decimal place with ties rounded up, suffixed with "hrs".
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 10.0).round() / 10.0;
    format!("{rounded:.1} hrs")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    pub label: Mood,
    pub average: f64,
    pub delta: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepSummary {
    pub average_hours: f64,
    pub formatted: String,
    pub delta: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RollingSummary {
    /// Rendered as a "keep tracking" placeholder, never as a zero.
    InsufficientData,
    Ready {
        entries_considered: usize,
        mood: MoodSummary,
        sleep: SleepSummary,
    },
}

/// Summarise a canonical (deduplicated, ascending) list.
pub fn summarize(canonical: &[MoodEntry]) -> RollingSummary {
    if canonical.len() < MIN_ENTRIES_FOR_SUMMARY {
        return RollingSummary::InsufficientData;
    }
    let Windows { last, prev } = split_windows(canonical);
    let (Some(mood_now), Some(sleep_now)) = (mood_average(last), sleep_average(last)) else {
        return RollingSummary::InsufficientData;
    };

    let mood_delta = trend_delta(Some(mood_now), mood_average(prev));
    let sleep_delta = trend_delta(Some(sleep_now), sleep_average(prev));

    RollingSummary::Ready {
        entries_considered: last.len(),
        mood: MoodSummary {
            label: Mood::from_average(mood_now),
            average: mood_now,
            delta: mood_delta,
            direction: TrendDirection::from_delta(mood_delta),
        },
        sleep: SleepSummary {
            average_hours: sleep_now,
            formatted: format_hours(sleep_now),
            delta: sleep_delta,
            direction: TrendDirection::from_delta(sleep_delta),
        },
    }
}
