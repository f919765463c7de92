use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db::repository::load_or_empty;
use crate::dto::{DeleteResponse, UpsertEntryRequest};
use crate::error::{AppError, AppResult};
use crate::handlers::{notify_entries_changed, AppJson, AppPath, LocalToday};
use crate::models::mood_entry::{EntryId, MoodEntry};
use crate::services::canonical::canonicalize;
use crate::AppState;

/// Canonical history: one entry per date, oldest first.
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Json<Vec<MoodEntry>> {
    let raw = load_or_empty(state.entries.as_ref(), auth_user.id).await;
    Json(canonicalize(&raw))
}

/// Create or replace the entry for a date (default: the caller's today).
pub async fn upsert_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    LocalToday(today): LocalToday,
    AppJson(body): AppJson<UpsertEntryRequest>,
) -> AppResult<Json<MoodEntry>> {
    let body = body.normalized();
    body.validate()?;
    let new_entry = body.into_new_entry(today).map_err(AppError::Validation)?;

    let saved = state.entries.upsert(auth_user.id, new_entry).await?;

    tracing::info!(
        user_id = %auth_user.id,
        entry_id = %saved.id,
        date = %saved.date,
        mood = %saved.mood,
        "Mood entry saved"
    );

    notify_entries_changed(&state, auth_user.id);
    Ok(Json(saved))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<DeleteResponse>> {
    let id = EntryId::new(id);
    let deleted = state.entries.remove(auth_user.id, &id).await?;

    if deleted {
        tracing::info!(user_id = %auth_user.id, entry_id = %id, "Mood entry deleted");
        notify_entries_changed(&state, auth_user.id);
    } else {
        tracing::debug!(user_id = %auth_user.id, entry_id = %id, "Delete of unknown entry");
    }

    Ok(Json(DeleteResponse { deleted, id }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::test_support::{
        delete, entry, get, issue_token, post_json, send, test_app, test_config, test_state,
        UnavailableRepository,
    };

    fn body(mood: &str) -> serde_json::Value {
        json!({
            "mood": mood,
            "feelings": ["Calm"],
            "reflection": "Quiet evening",
            "sleep_range": "7-8 hours",
        })
    }

    #[tokio::test]
    async fn test_requires_bearer_token() {
        let (app, _, _) = test_app();
        let res = send(&app, get("/api/entries", "garbage")).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body["error"]["code"], 401);
    }

    #[tokio::test]
    async fn test_upsert_defaults_to_today_then_replaces() {
        let (app, _, state) = test_app();
        let token = issue_token(&state.config, Uuid::new_v4(), None);

        let first = send(&app, post_json("/api/entries", &token, body("Sad"))).await;
        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(first.body["date"], "2025-03-05");
        assert_eq!(first.body["mood"], "Sad");

        let second = send(&app, post_json("/api/entries", &token, body("Happy"))).await;
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(second.body["id"], first.body["id"]);

        let list = send(&app, get("/api/entries", &token)).await;
        let list = list.body.as_array().unwrap().clone();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["mood"], "Happy");
    }

    #[tokio::test]
    async fn test_upsert_rejects_future_date_and_bad_payloads() {
        let (app, _, state) = test_app();
        let token = issue_token(&state.config, Uuid::new_v4(), None);

        let mut future = body("Happy");
        future["date"] = json!("2025-03-06");
        let res = send(&app, post_json("/api/entries", &token, future)).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

        let mut no_feelings = body("Happy");
        no_feelings["feelings"] = json!([]);
        let res = send(&app, post_json("/api/entries", &token, no_feelings)).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

        let res = send(&app, post_json("/api/entries", &token, body("Elated"))).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res.body["error"]["code"], 422);
        assert!(res.body["error"]["message"].as_str().unwrap().contains("Elated"));

        let mut bad_sleep = body("Happy");
        bad_sleep["sleep_range"] = json!("10 hours");
        let res = send(&app, post_json("/api/entries", &token, bad_sleep)).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res.body["error"]["code"], 422);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let (app, _, state) = test_app();
        let token = issue_token(&state.config, Uuid::new_v4(), None);

        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/api/entries")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"mood\": "))
            .unwrap();
        let res = send(&app, req).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["error"]["code"], 400);
    }

    #[tokio::test]
    async fn test_offset_header_moves_today() {
        let (app, _, state) = test_app();
        let token = issue_token(&state.config, Uuid::new_v4(), None);

        // 12:00 UTC is already the next day at UTC+13.
        let mut req = post_json("/api/entries", &token, body("Happy"));
        req.headers_mut().insert("x-utc-offset", "780".parse().unwrap());
        let res = send(&app, req).await;
        assert_eq!(res.body["date"], "2025-03-06");

        let mut req = post_json("/api/entries", &token, body("Happy"));
        req.headers_mut().insert("x-utc-offset", "eastern".parse().unwrap());
        let res = send(&app, req).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_collapses_duplicate_rows() {
        let (app, repo, state) = test_app();
        let user = Uuid::new_v4();
        let token = issue_token(&state.config, user, None);

        repo.insert_raw(user, entry("12", "2025-03-01", "Happy", "7-8 hours")).await;
        repo.insert_raw(user, entry("3", "2025-03-02", "Sad", "3-4 hours")).await;
        repo.insert_raw(user, entry("10", "2025-03-01", "Very Sad", "0-2 hours")).await;

        let res = send(&app, get("/api/entries", &token)).await;
        let list = res.body.as_array().unwrap().clone();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], "12");
        assert_eq!(list[0]["date"], "2025-03-01");
        assert_eq!(list[1]["id"], "3");
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (app, _, state) = test_app();
        let alice = issue_token(&state.config, Uuid::new_v4(), None);
        let bob = issue_token(&state.config, Uuid::new_v4(), None);

        send(&app, post_json("/api/entries", &alice, body("Happy"))).await;
        let res = send(&app, get("/api/entries", &bob)).await;
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_row_went_away() {
        let (app, _, state) = test_app();
        let token = issue_token(&state.config, Uuid::new_v4(), None);

        let saved = send(&app, post_json("/api/entries", &token, body("Happy"))).await;
        let id = saved.body["id"].as_str().unwrap().to_string();

        let res = send(&app, delete(&format!("/api/entries/{id}"), &token)).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!({ "deleted": true, "id": id }));

        let res = send(&app, delete(&format!("/api/entries/{id}"), &token)).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["deleted"], false);
    }

    #[tokio::test]
    async fn test_writes_are_rate_limited_per_user() {
        let mut config = test_config();
        config.write_rate_limit = 2;
        let state = test_state(Arc::new(crate::db::memory::MemoryEntryRepository::new()), config);
        let app = crate::build_router(state.clone());
        let token = issue_token(&state.config, Uuid::new_v4(), None);

        for _ in 0..2 {
            let res = send(&app, post_json("/api/entries", &token, body("Happy"))).await;
            assert_eq!(res.status, StatusCode::OK);
        }
        let res = send(&app, post_json("/api/entries", &token, body("Happy"))).await;
        assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);

        // Reads are not budgeted.
        let res = send(&app, get("/api/entries", &token)).await;
        assert_eq!(res.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_storage_failures() {
        let state = test_state(Arc::new(UnavailableRepository), test_config());
        let app = crate::build_router(state.clone());
        let token = issue_token(&state.config, Uuid::new_v4(), None);

        let res = send(&app, get("/api/entries", &token)).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!([]));

        let res = send(&app, post_json("/api/entries", &token, body("Happy"))).await;
        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body["error"]["message"], "Failed to save entry. Please try again.");
    }

    #[tokio::test]
    async fn test_save_broadcasts_change() {
        let (app, _, state) = test_app();
        let user = Uuid::new_v4();
        let token = issue_token(&state.config, user, None);
        let mut rx = state.ws_tx.as_ref().unwrap().subscribe();

        send(&app, post_json("/api/entries", &token, body("Happy"))).await;

        let msg: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(msg["type"], "entries_changed");
        assert_eq!(msg["user_id"], user.to_string());
    }
}
