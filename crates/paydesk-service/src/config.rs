//! Service configuration.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;

use paydesk_core::DEFAULT_ACCESS_WINDOW_DAYS;

/// Errors raised while loading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:5000").
    pub listen_addr: String,

    /// Document store location: `rocksdb://<dir>`, `file://<dir>` or a plain
    /// directory path.
    pub store_uri: String,

    /// Database name; the store lives in `<store dir>/<database_name>`.
    pub database_name: String,

    /// Shared secret Razorpay signs webhooks with.
    pub webhook_secret: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// How many days a payment keeps granting access to its download.
    pub access_window_days: i64,

    /// Optional JSON file of catalog items loaded at startup.
    pub catalog_seed_path: Option<String>,

    /// Whether the "Subject Details" intent is answered.
    pub enable_subject_details: bool,
}

/// Razorpay secrets file structure.
#[derive(Debug, Deserialize)]
struct RazorpaySecrets {
    webhook_secret: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the store location, database
    /// name or webhook secret is not configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            store_uri: required_var("STORE_URI")?,
            database_name: required_var("DATABASE_NAME")?,
            webhook_secret: load_webhook_secret()?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
            access_window_days: std::env::var("ACCESS_WINDOW_DAYS")
                .ok()
                .and_then(|s| parse_window_days(&s))
                .unwrap_or(defaults.access_window_days),
            catalog_seed_path: std::env::var("CATALOG_SEED_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            enable_subject_details: std::env::var("ENABLE_SUBJECT_DETAILS")
                .ok()
                .is_some_and(|s| parse_flag(&s)),
        })
    }

    /// Directory the `RocksDB` store is opened in.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        let root = self
            .store_uri
            .strip_prefix("rocksdb://")
            .or_else(|| self.store_uri.strip_prefix("file://"))
            .unwrap_or(&self.store_uri);
        Path::new(root).join(&self.database_name)
    }

    /// The payment access window as a duration.
    ///
    /// Falls back to the default window when the configured day count is
    /// out of range.
    #[must_use]
    pub fn access_window(&self) -> TimeDelta {
        TimeDelta::try_days(self.access_window_days)
            .filter(|window| *window > TimeDelta::zero())
            .unwrap_or_else(|| TimeDelta::days(DEFAULT_ACCESS_WINDOW_DAYS))
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Accept a positive day count that fits in a `TimeDelta`.
fn parse_window_days(value: &str) -> Option<i64> {
    let days: i64 = value.trim().parse().ok()?;
    if days > 0 && TimeDelta::try_days(days).is_some() {
        Some(days)
    } else {
        tracing::warn!(value = %value, "ACCESS_WINDOW_DAYS out of range, using default");
        None
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Load the webhook secret from a secrets file, falling back to the environment.
fn load_webhook_secret() -> Result<String, ConfigError> {
    let secret_paths = [
        ".secrets/razorpay.json",
        "paydesk/.secrets/razorpay.json",
        "../.secrets/razorpay.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<RazorpaySecrets>(path) {
            tracing::info!(path = %path, "Loaded Razorpay secrets from file");
            return Ok(secrets.webhook_secret);
        }
    }

    tracing::debug!("Razorpay secrets file not found, using environment variables");
    required_var("RAZORPAY_WEBHOOK_SECRET")
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".into(),
            store_uri: "rocksdb:///data".into(),
            database_name: "paydesk".into(),
            webhook_secret: String::new(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            access_window_days: DEFAULT_ACCESS_WINDOW_DAYS,
            catalog_seed_path: None,
            enable_subject_details: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_path_accepts_uri_forms() {
        let mut config = ServiceConfig {
            store_uri: "rocksdb:///var/lib/paydesk".into(),
            database_name: "prod".into(),
            ..ServiceConfig::default()
        };
        assert_eq!(config.store_path(), PathBuf::from("/var/lib/paydesk/prod"));

        config.store_uri = "file:///srv/db".into();
        assert_eq!(config.store_path(), PathBuf::from("/srv/db/prod"));

        config.store_uri = "./data".into();
        assert_eq!(config.store_path(), PathBuf::from("./data/prod"));
    }

    #[test]
    fn access_window_defaults_to_a_week() {
        assert_eq!(ServiceConfig::default().access_window(), TimeDelta::days(7));
    }

    #[test]
    fn oversized_access_window_does_not_panic() {
        assert_eq!(parse_window_days("30"), Some(30));
        assert_eq!(parse_window_days("0"), None);
        assert_eq!(parse_window_days("-3"), None);
        assert_eq!(parse_window_days("200000000000"), None);

        let config = ServiceConfig {
            access_window_days: 200_000_000_000,
            ..ServiceConfig::default()
        };
        assert_eq!(config.access_window(), TimeDelta::days(7));
    }

    #[test]
    fn flags() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
