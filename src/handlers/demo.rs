use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::dto::{ClearSampleDataResponse, SampleDataResponse};
use crate::error::{AppError, AppResult};
use crate::handlers::{notify_entries_changed, LocalToday};
use crate::services::sample_data::{is_sample, plan_sample_entries};
use crate::AppState;

// ── POST /api/demo/sample-data ───────────────────────────────────────────────

pub async fn seed_sample_data(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    LocalToday(today): LocalToday,
) -> AppResult<Json<SampleDataResponse>> {
    if !auth_user.is_demo {
        return Err(AppError::Forbidden);
    }

    let existing = state.entries.load_all(auth_user.id).await?;
    let plan = plan_sample_entries(today, &existing, &mut rand::thread_rng());

    let mut added = 0;
    for entry in plan.entries {
        state.entries.upsert(auth_user.id, entry).await?;
        added += 1;
    }

    tracing::info!(
        user_id = %auth_user.id,
        added = added,
        skipped = plan.skipped,
        "Demo sample data seeded"
    );

    if added > 0 {
        notify_entries_changed(&state, auth_user.id);
    }

    Ok(Json(SampleDataResponse {
        added,
        skipped: plan.skipped,
    }))
}

// ── DELETE /api/demo/sample-data ─────────────────────────────────────────────

/// Removes only generated rows; anything the user typed stays.
pub async fn clear_sample_data(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ClearSampleDataResponse>> {
    if !auth_user.is_demo {
        return Err(AppError::Forbidden);
    }

    let existing = state.entries.load_all(auth_user.id).await?;

    let mut removed = 0;
    for entry in existing.iter().filter(|e| is_sample(e)) {
        if state.entries.remove(auth_user.id, &entry.id).await? {
            removed += 1;
        }
    }

    tracing::info!(user_id = %auth_user.id, removed = removed, "Demo sample data cleared");

    if removed > 0 {
        notify_entries_changed(&state, auth_user.id);
    }

    Ok(Json(ClearSampleDataResponse { removed }))
}
