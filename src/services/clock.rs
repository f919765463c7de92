//! Local calendar date for "today", shared by entry creation and the
//! today-entry selector so both sides always agree.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

/// Largest offset in use anywhere (UTC+14 / UTC-12), with slack.
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse minutes east of UTC (`"-300"`, `"+330"`, `"0"`).
pub fn parse_offset_minutes(raw: &str) -> Option<FixedOffset> {
    let minutes: i32 = raw.trim().parse().ok()?;
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

/// `YYYY-MM-DD` at `now` for the caller. Without an offset the server's
/// local timezone is used.
pub fn local_date(now: DateTime<Utc>, offset: Option<FixedOffset>) -> NaiveDate {
    match offset {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.with_timezone(&Local).date_naive(),
    }
}
