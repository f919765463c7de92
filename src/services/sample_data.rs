//! Sample history for the demo account.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::models::mood_entry::{Mood, MoodEntry, NewMoodEntry, SleepRange};
use crate::services::trend::TREND_WINDOW;

pub const SAMPLE_REFLECTION_PREFIX: &str = "Test reflection for ";

fn feelings_for(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::VeryHappy => &["Joyful", "Motivated"],
        Mood::Happy => &["Grateful", "Calm"],
        Mood::Neutral => &["Peaceful"],
        Mood::Sad => &["Tired", "Down"],
        Mood::VerySad => &["Anxious", "Overwhelmed"],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplePlan {
    pub entries: Vec<NewMoodEntry>,
    pub skipped: usize,
}

/// One entry per day for the chart window ending `today`, oldest first,
/// skipping days that already have an entry. Today is always a good day.
pub fn plan_sample_entries<R: Rng>(
    today: NaiveDate,
    existing: &[MoodEntry],
    rng: &mut R,
) -> SamplePlan {
    let mut entries = Vec::new();
    let mut skipped = 0;

    for days_back in (0..TREND_WINDOW as i64).rev() {
        let date = today - Duration::days(days_back);
        if existing.iter().any(|e| e.date == date) {
            skipped += 1;
            continue;
        }

        let (mood, sleep_range) = if days_back == 0 {
            (Mood::Happy, SleepRange::SevenToEight)
        } else {
            (
                Mood::ALL[rng.gen_range(0..Mood::ALL.len())],
                SleepRange::ALL[rng.gen_range(0..SleepRange::ALL.len())],
            )
        };

        entries.push(NewMoodEntry {
            date,
            mood,
            feelings: feelings_for(mood).iter().map(|f| f.to_string()).collect(),
            reflection: format!(
                "{SAMPLE_REFLECTION_PREFIX}{date}. Feeling {} today.",
                mood.label().to_lowercase()
            ),
            sleep_range,
        });
    }

    SamplePlan { entries, skipped }
}

pub fn is_sample(entry: &MoodEntry) -> bool {
    entry.reflection.starts_with(SAMPLE_REFLECTION_PREFIX)
}
