//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/content_hub` |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `SEARCH_MODE` | `fulltext` |
//! | `RUN_MIGRATIONS` | `true` |
//! | `CORS_ALLOWED_ORIGINS` | any origin |
//!
//! Pool sizing is read by [`PoolConfig::from_env`].

use std::env;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use hub_core::Result;
use hub_db::PoolConfig;
use hub_search::SearchMode;

use crate::auth::AUTHORIZER_CONTEXT_HEADER;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/content_hub";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub search_mode: SearchMode,
    pub run_migrations: bool,
    /// `None` allows any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub pool: PoolConfig,
}

impl ServerConfig {
    /// Read configuration. Fails only on an unknown `SEARCH_MODE`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            search_mode: SearchMode::from_env()?,
            run_migrations: parse_bool_env("RUN_MIGRATIONS", true),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|v| split_origins(&v))
                .filter(|origins| !origins.is_empty()),
            pool: PoolConfig::from_env(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS for browser clients. Search is read-only, so only GET is allowed.
    pub fn cors_layer(&self) -> CorsLayer {
        let origin = match &self.cors_allowed_origins {
            None => AllowOrigin::any(),
            Some(origins) => AllowOrigin::list(origins.iter().filter_map(|o| {
                match o.parse::<HeaderValue>() {
                    Ok(v) => Some(v),
                    Err(e) => {
                        warn!("Invalid CORS origin '{}': {}", o, e);
                        None
                    }
                }
            })),
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
                HeaderName::from_static(AUTHORIZER_CONTEXT_HEADER),
            ])
            .expose_headers([header::CONTENT_DISPOSITION])
            .max_age(Duration::from_secs(3600))
    }
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Recognizes "true", "1", "yes", "on" and their negations, case-insensitive.
/// Anything else, or a missing variable, returns the default.
fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|val| parse_bool(&val))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
