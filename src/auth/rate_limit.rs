use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::AppState;

/// In-memory fixed-window limiter (single-instance deployments).
#[derive(Clone, Default)]
pub struct RateLimitState {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Ok(remaining) or Err(retry_after) once `key` has used up its window.
    pub async fn check_with_limits(
        &self,
        key: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<u32, Duration> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(window_secs);

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) > window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= max_requests {
            let retry_after = window.saturating_sub(now.duration_since(entry.window_start));
            return Err(retry_after);
        }

        entry.count += 1;
        Ok(max_requests - entry.count)
    }

    /// Drop entries whose window ended more than one window ago.
    pub async fn cleanup(&self, window_secs: u64) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let keep_for = Duration::from_secs(window_secs * 2);

        entries.retain(|_, entry| now.duration_since(entry.window_start) < keep_for);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Per-user budget for entry writes. Runs inside `require_auth`.
pub async fn rate_limit_writes(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = req
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.id)
        .ok_or(AppError::Unauthorized)?;

    let key = format!("write:{}", user_id);
    let config = &state.config;

    match state
        .rate_limiter
        .check_with_limits(&key, config.write_rate_limit, config.write_rate_window_secs)
        .await
    {
        Ok(remaining) => {
            tracing::debug!(user_id = %user_id, remaining = remaining, "Write rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                user_id = %user_id,
                retry_after_secs = retry_after.as_secs(),
                "Write rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

pub fn spawn_cleanup_worker(limiter: RateLimitState, window_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(window_secs.max(1) * 2));
        loop {
            interval.tick().await;
            limiter.cleanup(window_secs).await;
        }
    });
}
