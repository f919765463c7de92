use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{HealthResponse, ReadyzChecks, ReadyzResponse};
use crate::AppState;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "moodlog-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyzResponse>) {
    let storage = state.entries.ping().await;

    if storage {
        (
            StatusCode::OK,
            Json(ReadyzResponse {
                status: "ready",
                checks: ReadyzChecks { storage },
            }),
        )
    } else {
        tracing::warn!("Readiness check failed: storage unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyzResponse {
                status: "not_ready",
                checks: ReadyzChecks { storage },
            }),
        )
    }
}
