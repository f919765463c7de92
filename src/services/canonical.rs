//! Deduplication and ordering of a user's raw entry list.
//!
//! The store does not guarantee order, and two devices saving the same day at
//! nearly the same time can both insert. Every derived view goes through
//! [`canonicalize`] so that a date has exactly one authoritative entry: the
//! one with the numerically largest id, first-seen on ties.

use chrono::NaiveDate;

use crate::models::mood_entry::MoodEntry;

/// Returns a new list sorted ascending by date with at most one entry per date.
pub fn canonicalize(entries: &[MoodEntry]) -> Vec<MoodEntry> {
    let mut sorted: Vec<&MoodEntry> = entries.iter().collect();
    // Stable: same-date entries keep their input order for tie-breaking.
    sorted.sort_by_key(|e| e.date);

    let mut canonical: Vec<MoodEntry> = Vec::with_capacity(sorted.len());
    for entry in sorted {
        match canonical.last_mut() {
            Some(kept) if kept.date == entry.date => {
                tracing::warn!(
                    date = %entry.date,
                    kept_id = %kept.id,
                    other_id = %entry.id,
                    "Duplicate mood entries for one date"
                );
                if entry.id.is_newer_than(&kept.id) {
                    *kept = entry.clone();
                }
            }
            _ => canonical.push(entry.clone()),
        }
    }
    canonical
}

/// Dates that have more than one raw entry, ascending.
pub fn duplicate_dates(entries: &[MoodEntry]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort();
    let mut duplicates: Vec<NaiveDate> = dates
        .windows(2)
        .filter(|w| w[0] == w[1])
        .map(|w| w[0])
        .collect();
    duplicates.dedup();
    duplicates
}
