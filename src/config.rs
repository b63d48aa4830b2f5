//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects secrets as environment variables, so everything is
//! read once at startup and kept in memory.

use std::env;
use std::time::Duration;

/// Default per-source timeout for search fan-out.
const DEFAULT_SEARCH_SOURCE_TIMEOUT_MS: u64 = 3000;

/// Default timeout for the 1000-document stats scans.
const DEFAULT_STATS_SCAN_TIMEOUT_MS: u64 = 10_000;

/// Buttons one user may create in any 24-hour window.
pub const DEFAULT_BUTTON_DAILY_LIMIT: u32 = 20;

/// Google Cloud default daily quota for the YouTube Data API.
pub const DEFAULT_DAILY_QUOTA: u64 = 10_000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Channel whose videos are synced into the `videos` collection
    pub youtube_channel_id: Option<String>,
    /// Daily YouTube quota ceiling in units
    pub youtube_daily_quota: u64,
    /// Optional hourly YouTube quota ceiling in units
    pub youtube_hourly_quota: Option<u64>,
    /// Timeout applied to each search source
    pub search_source_timeout: Duration,
    /// Timeout for the stats aggregation scan
    pub stats_scan_timeout: Duration,
    /// Per-user audio button creations allowed per rolling 24 hours
    pub button_daily_limit: u32,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,
}

impl Config {
    /// Config for tests: fixed signing key, no YouTube credentials.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            youtube_channel_id: None,
            youtube_daily_quota: DEFAULT_DAILY_QUOTA,
            youtube_hourly_quota: None,
            search_source_timeout: Duration::from_millis(DEFAULT_SEARCH_SOURCE_TIMEOUT_MS),
            stats_scan_timeout: Duration::from_millis(DEFAULT_STATS_SCAN_TIMEOUT_MS),
            button_daily_limit: DEFAULT_BUTTON_DAILY_LIMIT,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            youtube_api_key: None,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8080)?,
            youtube_channel_id: optional_var("YOUTUBE_CHANNEL_ID"),
            youtube_daily_quota: parse_or("YOUTUBE_DAILY_QUOTA", DEFAULT_DAILY_QUOTA)?,
            youtube_hourly_quota: optional_var("YOUTUBE_HOURLY_QUOTA")
                .map(|v| {
                    v.parse()
                        .map_err(|_| ConfigError::Invalid("YOUTUBE_HOURLY_QUOTA", v))
                })
                .transpose()?,
            search_source_timeout: Duration::from_millis(parse_or(
                "SEARCH_SOURCE_TIMEOUT_MS",
                DEFAULT_SEARCH_SOURCE_TIMEOUT_MS,
            )?),
            stats_scan_timeout: Duration::from_millis(parse_or(
                "STATS_SCAN_TIMEOUT_MS",
                DEFAULT_STATS_SCAN_TIMEOUT_MS,
            )?),
            button_daily_limit: parse_or("BUTTON_DAILY_LIMIT", DEFAULT_BUTTON_DAILY_LIMIT)?,

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            youtube_api_key: optional_var("YOUTUBE_API_KEY"),
        })
    }
}

/// Read a trimmed variable, treating empty values as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name, raw)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
