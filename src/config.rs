use std::env;

use chrono::FixedOffset;

use crate::services::clock::parse_offset_minutes;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub jwt_secret: String,
    /// `None` skips the audience check.
    pub jwt_audience: Option<String>,

    pub demo_email: String,

    /// Used when a request carries no `X-UTC-Offset`; `None` = server local time.
    pub default_utc_offset: Option<FixedOffset>,

    pub write_rate_limit: u32,
    pub write_rate_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parses configuration through `get` so tests never touch the process
    /// environment. Panics on missing or malformed required values.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("postgres") {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres {
                database_url: get("DATABASE_URL").expect("DATABASE_URL must be set"),
            },
            other => panic!("STORAGE_BACKEND must be 'postgres' or 'memory', got {other:?}"),
        };

        Self {
            storage,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: get("PORT")
                .unwrap_or_else(|| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: get("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".into()),

            jwt_secret: get("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_audience: match get("JWT_AUDIENCE") {
                Some(aud) if aud.is_empty() => None,
                Some(aud) => Some(aud),
                None => Some("authenticated".into()),
            },

            demo_email: get("DEMO_EMAIL").unwrap_or_else(|| "jane@demo.com".into()),

            default_utc_offset: get("DEFAULT_UTC_OFFSET_MINUTES")
                .filter(|s| !s.is_empty())
                .map(|s| {
                    parse_offset_minutes(&s).expect(
                        "DEFAULT_UTC_OFFSET_MINUTES must be whole minutes between -840 and 840",
                    )
                }),

            write_rate_limit: get("WRITE_RATE_LIMIT")
                .unwrap_or_else(|| "30".into())
                .parse()
                .unwrap_or(30),
            write_rate_window_secs: get("WRITE_RATE_WINDOW_SECS")
                .unwrap_or_else(|| "60".into())
                .parse()
                .unwrap_or(60),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_demo_email(&self, email: Option<&str>) -> bool {
        email.is_some_and(|e| !e.is_empty() && e.eq_ignore_ascii_case(&self.demo_email))
    }
}
