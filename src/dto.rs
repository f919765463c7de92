//! # Moodlog: Request/Response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Field validation is expressed via `validator` derive macros

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::mood_entry::{EntryId, Mood, MoodEntry, NewMoodEntry, SleepRange};
use crate::services::rolling::RollingSummary;
use crate::services::trend::TrendWindow;

pub const MAX_FEELING_CHARS: usize = 32;

// ============================================================================
// Entries
// ============================================================================

/// POST /api/entries
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertEntryRequest {
    /// Defaults to the caller's local today. Future dates are rejected.
    pub date: Option<NaiveDate>,

    pub mood: Mood,

    #[validate(length(min = 1, max = 3, message = "Select between 1 and 3 feelings"))]
    #[validate(custom = "validate_feeling_tags")]
    pub feelings: Vec<String>,

    #[validate(length(min = 1, max = 150, message = "Reflection must be 1-150 characters"))]
    pub reflection: String,

    pub sleep_range: SleepRange,
}

fn validate_feeling_tags(feelings: &Vec<String>) -> Result<(), ValidationError> {
    let bad = feelings
        .iter()
        .any(|f| f.is_empty() || f.chars().count() > MAX_FEELING_CHARS);
    if bad {
        let mut err = ValidationError::new("feeling_tag");
        err.message = Some(format!("Feeling tags must be 1-{MAX_FEELING_CHARS} characters").into());
        return Err(err);
    }
    Ok(())
}

impl UpsertEntryRequest {
    /// Trim text, drop blank and repeated feeling tags (first occurrence wins).
    pub fn normalized(mut self) -> Self {
        let mut feelings: Vec<String> = Vec::with_capacity(self.feelings.len());
        for tag in self.feelings.iter().map(|f| f.trim()) {
            if !tag.is_empty() && !feelings.iter().any(|f| f == tag) {
                feelings.push(tag.to_string());
            }
        }
        self.feelings = feelings;
        self.reflection = self.reflection.trim().to_string();
        self
    }

    /// Resolve the entry date against the caller's local today.
    pub fn into_new_entry(self, local_today: NaiveDate) -> Result<NewMoodEntry, String> {
        let date = self.date.unwrap_or(local_today);
        if date > local_today {
            return Err(format!("Entry date {date} is in the future"));
        }
        Ok(NewMoodEntry {
            date,
            mood: self.mood,
            feelings: self.feelings,
            reflection: self.reflection,
            sleep_range: self.sleep_range,
        })
    }
}

/// DELETE /api/entries/:id
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: EntryId,
}

// ============================================================================
// Views
// ============================================================================

/// GET /api/entries/today
#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub entry: Option<MoodEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<&'static str>,
}

/// GET /api/dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub today: TodayResponse,
    pub summary: RollingSummary,
    pub trends: TrendWindow,
    pub total_entries: usize,
    /// Stored rows dropped because a newer row exists for the same date.
    pub duplicates_collapsed: usize,
    pub duplicate_dates: Vec<NaiveDate>,
}

// ============================================================================
// Demo
// ============================================================================

/// POST /api/demo/sample-data
#[derive(Debug, Serialize)]
pub struct SampleDataResponse {
    pub added: usize,
    pub skipped: usize,
}

/// DELETE /api/demo/sample-data
#[derive(Debug, Serialize)]
pub struct ClearSampleDataResponse {
    pub removed: usize,
}

// ============================================================================
// System
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: &'static str,
    pub checks: ReadyzChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    pub storage: bool,
}
