//! Configuration management
//!
//! This module handles loading and parsing configuration for the admin client.
//! Configuration can be loaded from:
//! - an `admin.yml` file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults. The dashboard itself
//! never reads the environment; the binary loads a `Config` and injects it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::RetryPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend content API
    #[serde(default)]
    pub api: ApiConfig,
    /// Transient notifications
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Retry behavior for failed requests
    #[serde(default)]
    pub retry: RetryConfig,
    /// Local upload handling
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Backend content API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the backend, e.g. `http://127.0.0.1:5000`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds; unset means requests wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Value of the `Cookie` header carrying the admin session
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            session_cookie: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a notification stays visible, in milliseconds
    #[serde(default = "default_notification_ttl")]
    pub ttl_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_notification_ttl(),
        }
    }
}

fn default_notification_ttl() -> u64 {
    4000
}

/// Longest accepted notification lifetime (one day)
pub const MAX_NOTIFICATION_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first one (1 = never retry)
    ///
    /// Applies to list fetches and deletes only. Uploads are never resent, since a
    /// transport error can arrive after the backend stored them.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for every further retry
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_base_delay() -> u64 {
    200
}

/// Upload configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Media types eligible for local previews; empty accepts any `image/*`
    #[serde(default)]
    pub image_types: Vec<String>,
}

impl UploadConfig {
    /// Check if a media type gets a local preview
    pub fn is_previewable(&self, media_type: &str) -> bool {
        if self.image_types.is_empty() {
            media_type.starts_with("image/")
        } else {
            self.image_types.iter().any(|t| t == media_type)
        }
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - PORTFOLIO_ADMIN_BASE_URL
    /// - PORTFOLIO_ADMIN_REQUEST_TIMEOUT_SECS
    /// - PORTFOLIO_ADMIN_SESSION_COOKIE
    /// - PORTFOLIO_ADMIN_NOTIFICATION_TTL_MS
    /// - PORTFOLIO_ADMIN_RETRY_MAX_ATTEMPTS
    /// - PORTFOLIO_ADMIN_RETRY_BASE_DELAY_MS
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("api.base_url must not be empty".into()));
        }
        if self.notifications.ttl_ms > MAX_NOTIFICATION_TTL_MS {
            return Err(ConfigError::ValidationError(format!(
                "notifications.ttl_ms must be at most {}",
                MAX_NOTIFICATION_TTL_MS
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PORTFOLIO_ADMIN_BASE_URL") {
            self.api.base_url = url;
        }
        if let Ok(secs) = std::env::var("PORTFOLIO_ADMIN_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.api.request_timeout_secs = Some(secs);
            }
        }
        if let Ok(cookie) = std::env::var("PORTFOLIO_ADMIN_SESSION_COOKIE") {
            self.api.session_cookie = Some(cookie);
        }

        if let Ok(ttl) = std::env::var("PORTFOLIO_ADMIN_NOTIFICATION_TTL_MS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                self.notifications.ttl_ms = ttl;
            }
        }

        if let Ok(attempts) = std::env::var("PORTFOLIO_ADMIN_RETRY_MAX_ATTEMPTS") {
            if let Ok(attempts) = attempts.parse::<u32>() {
                self.retry.max_attempts = attempts;
            }
        }
        if let Ok(delay) = std::env::var("PORTFOLIO_ADMIN_RETRY_BASE_DELAY_MS") {
            if let Ok(delay) = delay.parse::<u64>() {
                self.retry.base_delay_ms = delay;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_VARS: [&str; 6] = [
        "PORTFOLIO_ADMIN_BASE_URL",
        "PORTFOLIO_ADMIN_REQUEST_TIMEOUT_SECS",
        "PORTFOLIO_ADMIN_SESSION_COOKIE",
        "PORTFOLIO_ADMIN_NOTIFICATION_TTL_MS",
        "PORTFOLIO_ADMIN_RETRY_MAX_ATTEMPTS",
        "PORTFOLIO_ADMIN_RETRY_BASE_DELAY_MS",
    ];

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        let guard = super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        guard
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_admin_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.api.session_cookie, None);
        assert_eq!(config.notifications.ttl_ms, 4000);
        assert_eq!(config.retry.max_attempts, 1);
        assert!(config.upload.image_types.is_empty());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "   \n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  base_url: \"https://example.org\"\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://example.org");
        assert_eq!(config.notifications.ttl_ms, 4000);
        assert_eq!(config.retry.base_delay_ms, 200);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
api:
  base_url: "http://admin.local:8000"
  request_timeout_secs: 15
  session_cookie: "session=abc"
notifications:
  ttl_ms: 2500
retry:
  max_attempts: 3
  base_delay_ms: 50
upload:
  image_types: ["image/png", "image/jpeg"]
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.api.session_cookie.as_deref(), Some("session=abc"));
        assert_eq!(config.notifications.ttl_ms, 2500);
        assert_eq!(config.retry.policy().max_attempts(), 3);
        assert!(config.upload.is_previewable("image/png"));
        assert!(!config.upload.is_previewable("image/gif"));
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "retry:\n  max_attempts: lots\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("line"));
    }

    #[test]
    fn test_default_upload_accepts_any_image() {
        let upload = UploadConfig::default();
        assert!(upload.is_previewable("image/webp"));
        assert!(!upload.is_previewable("application/pdf"));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  base_url: \"http://file.local\"\n").unwrap();

        std::env::set_var("PORTFOLIO_ADMIN_BASE_URL", "http://env.local");
        std::env::set_var("PORTFOLIO_ADMIN_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("PORTFOLIO_ADMIN_RETRY_MAX_ATTEMPTS", "4");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://env.local");
        assert_eq!(config.api.request_timeout_secs, Some(30));
        assert_eq!(config.retry.max_attempts, 4);

        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_invalid_numbers_ignored() {
        let _guard = lock_env();

        std::env::set_var("PORTFOLIO_ADMIN_NOTIFICATION_TTL_MS", "soon");
        std::env::set_var("PORTFOLIO_ADMIN_RETRY_BASE_DELAY_MS", "-5");

        let config = Config::load_with_env(std::path::Path::new("nonexistent_admin_config.yml")).unwrap();

        assert_eq!(config.notifications.ttl_ms, 4000);
        assert_eq!(config.retry.base_delay_ms, 200);

        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "retry:\n  max_attempts: 0\n").unwrap();

        let err = Config::load_with_env(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range_ttl() {
        let _guard = lock_env();

        std::env::set_var("PORTFOLIO_ADMIN_NOTIFICATION_TTL_MS", (i64::MAX as u64).to_string());
        let err = Config::load_with_env(std::path::Path::new("nonexistent_admin_config.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        std::env::set_var("PORTFOLIO_ADMIN_NOTIFICATION_TTL_MS", MAX_NOTIFICATION_TTL_MS.to_string());
        let config = Config::load_with_env(std::path::Path::new("nonexistent_admin_config.yml")).unwrap();
        assert_eq!(config.notifications.ttl_ms, MAX_NOTIFICATION_TTL_MS);

        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Serializing a config to YAML and loading it back preserves every field
        #[test]
        fn config_roundtrip(
            base_url in "https?://[a-z]{1,12}(\\.[a-z]{2,4})?(:[0-9]{2,5})?",
            timeout in proptest::option::of(1u64..600),
            ttl_ms in 0u64..60_000,
            max_attempts in 1u32..10,
            base_delay_ms in 0u64..5_000,
        ) {
            let mut config = Config::default();
            config.api.base_url = base_url;
            config.api.request_timeout_secs = timeout;
            config.notifications.ttl_ms = ttl_ms;
            config.retry.max_attempts = max_attempts;
            config.retry.base_delay_ms = base_delay_ms;

            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.api.base_url, parsed.api.base_url);
            prop_assert_eq!(config.api.request_timeout_secs, parsed.api.request_timeout_secs);
            prop_assert_eq!(config.notifications.ttl_ms, parsed.notifications.ttl_ms);
            prop_assert_eq!(config.retry.max_attempts, parsed.retry.max_attempts);
            prop_assert_eq!(config.retry.base_delay_ms, parsed.retry.base_delay_ms);
        }
    }
}
