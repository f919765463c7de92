//! Read-only projections over a user's history. Every view starts from the
//! same canonical list, so the summary, chart and today card never disagree
//! about which entry represents a date.

use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;

use crate::auth::middleware::AuthUser;
use crate::db::repository::load_or_empty;
use crate::dto::{DashboardResponse, TodayResponse};
use crate::handlers::LocalToday;
use crate::models::mood_entry::MoodEntry;
use crate::services::canonical::{canonicalize, duplicate_dates};
use crate::services::quotes::random_quote;
use crate::services::rolling::{summarize, RollingSummary};
use crate::services::today::select_today;
use crate::services::trend::{build_trend_window, TrendWindow};
use crate::AppState;

fn today_view(canonical: &[MoodEntry], today: NaiveDate) -> TodayResponse {
    let entry = select_today(canonical, today).cloned();
    let quote = entry
        .as_ref()
        .and_then(|e| random_quote(e.mood.ordinal(), &mut rand::thread_rng()));
    TodayResponse {
        date: today,
        entry,
        quote,
    }
}

pub async fn get_today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    LocalToday(today): LocalToday,
) -> Json<TodayResponse> {
    let raw = load_or_empty(state.entries.as_ref(), auth_user.id).await;
    Json(today_view(&canonicalize(&raw), today))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Json<RollingSummary> {
    let raw = load_or_empty(state.entries.as_ref(), auth_user.id).await;
    Json(summarize(&canonicalize(&raw)))
}

pub async fn get_trends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Json<TrendWindow> {
    let raw = load_or_empty(state.entries.as_ref(), auth_user.id).await;
    Json(build_trend_window(&raw))
}

/// Everything the home screen renders, from a single load.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    LocalToday(today): LocalToday,
) -> Json<DashboardResponse> {
    let raw = load_or_empty(state.entries.as_ref(), auth_user.id).await;
    let canonical = canonicalize(&raw);

    Json(DashboardResponse {
        today: today_view(&canonical, today),
        summary: summarize(&canonical),
        trends: build_trend_window(&canonical),
        total_entries: canonical.len(),
        duplicates_collapsed: raw.len() - canonical.len(),
        duplicate_dates: duplicate_dates(&raw),
    })
}
