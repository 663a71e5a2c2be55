//! Configuration module for the site CMS backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key gating write access (admin only)
    pub admin_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Quiet period before an editor auto-save fires
    pub autosave_quiet: Duration,
    /// Origins allowed to call the API cross-origin
    pub allowed_origins: Vec<String>,
    /// Public base URL of the site, used for share links; the request host when unset
    pub public_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let admin_psk = env::var("SITECMS_ADMIN_PSK")
            .ok()
            .filter(|key| !key.is_empty());

        let db_path = env::var("SITECMS_DB_PATH")
            .unwrap_or_else(|_| "./data/site.sqlite".to_string())
            .into();

        let bind_addr = env::var("SITECMS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid SITECMS_BIND_ADDR: {}", e)))?;

        let log_level = env::var("SITECMS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = match env::var("SITECMS_LOG_FORMAT").as_deref() {
            Err(_) | Ok("text") => false,
            Ok("json") => true,
            Ok(other) => {
                return Err(AppError::Config(format!(
                    "Invalid SITECMS_LOG_FORMAT: {} (expected text or json)",
                    other
                )))
            }
        };

        let autosave_ms: u64 = env::var("SITECMS_AUTOSAVE_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid SITECMS_AUTOSAVE_MS: {}", e)))?;

        let allowed_origins = env::var("SITECMS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let public_url = env::var("SITECMS_PUBLIC_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            admin_psk,
            db_path,
            bind_addr,
            log_level,
            log_json,
            autosave_quiet: Duration::from_millis(autosave_ms),
            allowed_origins,
            public_url,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}
