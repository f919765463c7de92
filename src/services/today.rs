use chrono::NaiveDate;

use crate::models::mood_entry::MoodEntry;

/// The authoritative entry for `today`, if one was logged.
///
/// Works on raw or canonical input; among same-day entries the strictly
/// largest id wins and the first one seen wins ties.
pub fn select_today(entries: &[MoodEntry], today: NaiveDate) -> Option<&MoodEntry> {
    entries
        .iter()
        .filter(|e| e.date == today)
        .fold(None, |best: Option<&MoodEntry>, e| match best {
            Some(b) if !e.id.is_newer_than(&b.id) => Some(b),
            _ => Some(e),
        })
}
