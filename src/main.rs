use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use auth::rate_limit::RateLimitState;
use config::{Config, StorageBackend};
use db::memory::MemoryEntryRepository;
use db::postgres::PgEntryRepository;
use db::repository::EntryRepository;
use services::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<dyn EntryRepository>,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub ws_tx: Option<broadcast::Sender<String>>,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodlog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let entries: Arc<dyn EntryRepository> = match &config.storage {
        StorageBackend::Postgres { database_url } => {
            let pool = db::pool::create_pool(database_url).await?;
            db::pool::run_migrations(&pool).await?;
            Arc::new(PgEntryRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; entries are lost on restart");
            Arc::new(MemoryEntryRepository::new())
        }
    };

    let (ws_tx, _) = broadcast::channel::<String>(256);

    let rate_limiter = RateLimitState::new();
    auth::rate_limit::spawn_cleanup_worker(rate_limiter.clone(), config.write_rate_window_secs);

    let state = AppState {
        entries,
        config: config.clone(),
        clock: Arc::new(SystemClock),
        ws_tx: Some(ws_tx),
        rate_limiter,
    };

    let app = build_router(state).layer(cors_layer(&config));

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/ws", get(handlers::ws::ws_handler));

    // Layers run bottom-up: auth resolves the user before the write budget.
    let write_routes = Router::new()
        .route("/api/entries", post(handlers::entries::upsert_entry))
        .route("/api/entries/:id", delete(handlers::entries::delete_entry))
        .route(
            "/api/demo/sample-data",
            post(handlers::demo::seed_sample_data).delete(handlers::demo::clear_sample_data),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_writes,
        ));

    let protected_routes = Router::new()
        .route("/api/entries", get(handlers::entries::list_entries))
        .route("/api/entries/today", get(handlers::views::get_today))
        .route("/api/summary", get(handlers::views::get_summary))
        .route("/api/trends", get(handlers::views::get_trends))
        .route("/api/dashboard", get(handlers::views::get_dashboard))
        .merge(write_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::new();
    match config.frontend_url.parse::<HeaderValue>() {
        Ok(hv) => origins.push(hv),
        Err(_) => tracing::warn!(url = %config.frontend_url, "FRONTEND_URL is not a valid origin"),
    }
    // In dev, also allow LAN access (e.g. testing from another device)
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',') {
            if let Ok(hv) = o.trim().parse::<HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(handlers::UTC_OFFSET_HEADER),
        ])
        .allow_credentials(true)
}
