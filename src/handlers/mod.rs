pub mod demo;
pub mod entries;
pub mod health;
pub mod views;
pub mod ws;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::clock::{local_date, parse_offset_minutes};
use crate::AppState;

/// Minutes east of UTC, as sent by the browser (`-new Date().getTimezoneOffset()`).
pub const UTC_OFFSET_HEADER: &str = "x-utc-offset";

/// `Json` whose rejections come back in the `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Path` whose rejections come back in the `AppError` envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// The caller's local calendar date right now.
#[derive(Debug, Clone, Copy)]
pub struct LocalToday(pub NaiveDate);

#[async_trait]
impl FromRequestParts<AppState> for LocalToday {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let offset = match parts.headers.get(UTC_OFFSET_HEADER) {
            Some(value) => {
                let parsed = value.to_str().ok().and_then(parse_offset_minutes);
                Some(parsed.ok_or_else(|| {
                    AppError::Validation("X-UTC-Offset must be whole minutes between -840 and 840".into())
                })?)
            }
            None => state.config.default_utc_offset,
        };

        Ok(LocalToday(local_date(state.clock.now(), offset)))
    }
}

/// Tell the user's open sockets to refetch.
pub(crate) fn notify_entries_changed(state: &AppState, user_id: Uuid) {
    if let Some(tx) = &state.ws_tx {
        let msg = json!({
            "type": "entries_changed",
            "user_id": user_id,
        });
        // No subscribers is fine.
        let _ = tx.send(msg.to_string());
    }
}
