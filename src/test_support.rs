//! Shared fixtures for unit and router tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::Rng;
use tokio::sync::broadcast;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::auth::rate_limit::RateLimitState;
use crate::config::{Config, StorageBackend};
use crate::db::memory::MemoryEntryRepository;
use crate::db::repository::{EntryRepository, RepoError, RepoResult};
use crate::models::mood_entry::{EntryId, Mood, MoodEntry, NewMoodEntry, SleepRange};
use crate::services::clock::FixedClock;
use crate::AppState;

pub const DEMO_EMAIL: &str = "jane@demo.com";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn entry(id: &str, day: &str, mood: &str, sleep: &str) -> MoodEntry {
    MoodEntry {
        id: EntryId::new(id),
        date: date(day),
        mood: mood.parse().unwrap(),
        feelings: vec![],
        reflection: String::new(),
        sleep_range: sleep.parse().unwrap(),
    }
}

/// One entry per consecutive day from `start`, ids 1.., sleep "7-8 hours".
pub fn series(moods: &[&str], start: &str) -> Vec<MoodEntry> {
    let start = date(start);
    moods
        .iter()
        .enumerate()
        .map(|(i, mood)| MoodEntry {
            id: EntryId::from(i as i64 + 1),
            date: start + Duration::days(i as i64),
            mood: mood.parse().unwrap(),
            feelings: vec![],
            reflection: String::new(),
            sleep_range: SleepRange::SevenToEight,
        })
        .collect()
}

/// Up to `max_len` entries spread over `day_span` days, with colliding
/// numeric ids and the occasional non-numeric one.
pub fn random_entries<R: Rng>(rng: &mut R, max_len: usize, day_span: i64) -> Vec<MoodEntry> {
    let start = date("2025-01-01");
    let len = rng.gen_range(0..=max_len);
    (0..len)
        .map(|_| {
            let id = if rng.gen_bool(0.1) {
                format!("id-{}", rng.gen_range(0..5))
            } else {
                rng.gen_range(0..20).to_string()
            };
            MoodEntry {
                id: EntryId::new(id),
                date: start + Duration::days(rng.gen_range(0..day_span.max(1))),
                mood: Mood::ALL[rng.gen_range(0..5)],
                feelings: vec![],
                reflection: String::new(),
                sleep_range: SleepRange::ALL[rng.gen_range(0..5)],
            }
        })
        .collect()
}

/// A store that is always down.
pub struct UnavailableRepository;

#[async_trait]
impl EntryRepository for UnavailableRepository {
    async fn load_all(&self, _user_id: Uuid) -> RepoResult<Vec<MoodEntry>> {
        Err(RepoError::Unavailable("connection refused".into()))
    }

    async fn upsert(&self, _user_id: Uuid, _entry: NewMoodEntry) -> RepoResult<MoodEntry> {
        Err(RepoError::Unavailable("connection refused".into()))
    }

    async fn remove(&self, _user_id: Uuid, _id: &EntryId) -> RepoResult<bool> {
        Err(RepoError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> bool {
        false
    }
}

pub fn test_config() -> Config {
    Config {
        storage: StorageBackend::Memory,
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:5173".into(),
        jwt_secret: "test-secret".into(),
        jwt_audience: Some("authenticated".into()),
        demo_email: DEMO_EMAIL.into(),
        default_utc_offset: FixedOffset::east_opt(0),
        write_rate_limit: 100,
        write_rate_window_secs: 60,
    }
}

pub fn issue_token(config: &Config, user_id: Uuid, email: Option<&str>) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.map(str::to_string),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: Some(now.timestamp()),
        aud: config.jwt_audience.clone(),
        role: Some("authenticated".into()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

/// 2025-03-05 12:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap()
}

pub fn test_state(repo: Arc<dyn EntryRepository>, config: Config) -> AppState {
    let (ws_tx, _) = broadcast::channel::<String>(16);
    AppState {
        entries: repo,
        config: Arc::new(config),
        clock: Arc::new(FixedClock(test_now())),
        ws_tx: Some(ws_tx),
        rate_limiter: RateLimitState::new(),
    }
}

/// Router over a fresh memory store, plus a direct handle on that store.
pub fn test_app() -> (Router, MemoryEntryRepository, AppState) {
    let repo = MemoryEntryRepository::new();
    let state = test_state(Arc::new(repo.clone()), test_config());
    (crate::build_router(state.clone()), repo, state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    TestResponse { status, body }
}

pub fn get(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(path: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}
