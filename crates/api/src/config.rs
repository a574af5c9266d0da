use std::path::PathBuf;

use civic_core::category::CategoryDeletePolicy;
use civic_core::photo::MAX_PHOTO_BYTES;

use crate::auth::jwt::JwtConfig;

/// Default cap on a whole request body, multipart uploads included (4 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory that uploaded photos are written to and served from.
    pub media_root: PathBuf,
    /// Maximum accepted request body size in bytes. Bodies above it get 413
    /// before any field is validated, so it must exceed the photo limit.
    pub max_upload_bytes: usize,
    /// What deleting a category does to the requests filed under it.
    pub category_delete_policy: CategoryDeletePolicy,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `MEDIA_ROOT`             | `media`                    |
    /// | `MAX_UPLOAD_BYTES`       | `4194304`                  |
    /// | `CATEGORY_DELETE_POLICY` | `restrict`                 |
    ///
    /// JWT settings are documented on [`JwtConfig::from_lookup`].
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let media_root = PathBuf::from(lookup("MEDIA_ROOT").unwrap_or_else(|| "media".into()));

        let max_upload_bytes: usize = lookup("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        // Below this a photo at the size limit could never reach validation.
        assert!(
            max_upload_bytes > MAX_PHOTO_BYTES,
            "MAX_UPLOAD_BYTES ({max_upload_bytes}) must exceed the {MAX_PHOTO_BYTES}-byte photo limit"
        );

        let category_delete_policy = lookup("CATEGORY_DELETE_POLICY")
            .map(|v| {
                v.parse()
                    .unwrap_or_else(|e| panic!("CATEGORY_DELETE_POLICY: {e}"))
            })
            .unwrap_or_default();

        let jwt = JwtConfig::from_lookup(&lookup);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            media_root,
            max_upload_bytes,
            category_delete_policy,
            jwt,
        }
    }
}
