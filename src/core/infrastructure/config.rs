//! Client configuration: builder, environment variables and JSON files.

use crate::core::domain::{
    error::{DashboardResult, ValidationError},
    value_object::{ApiBaseUrl, validate_url},
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_READ_RETRIES: u32 = 2;
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1_000);

pub const ENV_BASE_URL: &str = "PVE_DASHBOARD_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "PVE_DASHBOARD_TIMEOUT_MS";
pub const ENV_READ_RETRIES: &str = "PVE_DASHBOARD_READ_RETRIES";
pub const ENV_BACKOFF_MS: &str = "PVE_DASHBOARD_BACKOFF_MS";

/// Client-side request rate limit (token bucket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Auto-dismiss delays per toast severity. Zero keeps the toast until it is
/// removed explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationConfig {
    pub success_duration: Duration,
    pub info_duration: Duration,
    pub warning_duration: Duration,
    pub error_duration: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_duration: Duration::from_millis(3_000),
            info_duration: Duration::from_millis(5_000),
            warning_duration: Duration::from_millis(5_000),
            error_duration: Duration::from_millis(8_000),
        }
    }
}

/// Validated configuration shared by the request layer and the notification manager.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: ApiBaseUrl,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry budget of read (GET) operations. Mutating calls never retry.
    pub read_retries: u32,
    /// Backoff unit: a retry waits `(3 - retries left) * backoff_base`.
    pub backoff_base: Duration,
    pub rate_limit: Option<RateLimitConfig>,
    pub accept_invalid_certs: bool,
    pub notifications: NotificationConfig,
}

impl DashboardConfig {
    /// Creates a new builder for DashboardConfig
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Builds a configuration from `PVE_DASHBOARD_*` environment variables,
    /// using defaults for anything unset.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> DashboardResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::field(
                "config_file",
                format!("Cannot read {}: {}", path.display(), e),
            )
        })?;
        let file: ConfigFile = serde_json::from_str(&raw).map_err(|e| {
            ValidationError::Format(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        file.into_builder().build()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let mut builder = Self::builder();
        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            builder = builder.timeout(Duration::from_millis(parse_env(ENV_TIMEOUT_MS, &ms)?));
        }
        if let Some(retries) = lookup(ENV_READ_RETRIES) {
            builder = builder.read_retries(parse_env(ENV_READ_RETRIES, &retries)?);
        }
        if let Some(ms) = lookup(ENV_BACKOFF_MS) {
            builder = builder.backoff_base(Duration::from_millis(parse_env(ENV_BACKOFF_MS, &ms)?));
        }
        builder.build()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::field(key, format!("'{}' is not a valid number", value)))
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    read_retries: Option<u32>,
    backoff_base: Option<Duration>,
    rate_limit: Option<RateLimitConfig>,
    accept_invalid_certs: bool,
    notifications: Option<NotificationConfig>,
}

impl DashboardConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn read_retries(mut self, retries: u32) -> Self {
        self.read_retries = Some(retries);
        self
    }

    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = Some(base);
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn build(self) -> DashboardResult<DashboardConfig> {
        let url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        validate_url(url)?;
        let base_url = ApiBaseUrl::new(url)?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ValidationError::field("timeout", "Timeout must be greater than 0").into());
        }

        if let Some(rl) = &self.rate_limit {
            if rl.requests_per_second == 0 || rl.burst_size == 0 {
                return Err(ValidationError::ConstraintViolation(
                    "Rate limit requests_per_second and burst_size must be greater than 0"
                        .to_string(),
                )
                .into());
            }
        }

        Ok(DashboardConfig {
            base_url,
            timeout,
            read_retries: self.read_retries.unwrap_or(DEFAULT_READ_RETRIES),
            backoff_base: self.backoff_base.unwrap_or(DEFAULT_BACKOFF_BASE),
            rate_limit: self.rate_limit,
            accept_invalid_certs: self.accept_invalid_certs,
            notifications: self.notifications.unwrap_or_default(),
        })
    }
}

/// On-disk form of the configuration; durations are in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
    read_retries: Option<u32>,
    backoff_ms: Option<u64>,
    rate_limit: Option<RateLimitConfig>,
    accept_invalid_certs: bool,
    toast_durations_ms: Option<ToastDurations>,
}

#[derive(Debug, Deserialize)]
struct ToastDurations {
    success: u64,
    info: u64,
    warning: u64,
    error: u64,
}

impl ConfigFile {
    fn into_builder(self) -> DashboardConfigBuilder {
        let mut builder = DashboardConfig::builder().accept_invalid_certs(self.accept_invalid_certs);
        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if let Some(retries) = self.read_retries {
            builder = builder.read_retries(retries);
        }
        if let Some(ms) = self.backoff_ms {
            builder = builder.backoff_base(Duration::from_millis(ms));
        }
        if let Some(rl) = self.rate_limit {
            builder = builder.rate_limit(rl.requests_per_second, rl.burst_size);
        }
        if let Some(t) = self.toast_durations_ms {
            builder = builder.notifications(NotificationConfig {
                success_duration: Duration::from_millis(t.success),
                info_duration: Duration::from_millis(t.info),
                warning_duration: Duration::from_millis(t.warning),
                error_duration: Duration::from_millis(t.error),
            });
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::error::DashboardError;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::builder().build().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/api");
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.read_retries, 2);
        assert_eq!(config.backoff_base, Duration::from_millis(1_000));
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        let result = DashboardConfig::builder().base_url("ftp://nope").build();
        assert!(matches!(result, Err(DashboardError::Validation { .. })));

        let result = DashboardConfig::builder().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(DashboardError::Validation { .. })));

        let result = DashboardConfig::builder().rate_limit(0, 5).build();
        assert!(matches!(result, Err(DashboardError::Validation { .. })));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "https://dash.example.com/api"),
            (ENV_TIMEOUT_MS, "5000"),
            (ENV_READ_RETRIES, "4"),
        ]);
        let config =
            DashboardConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url.as_str(), "https://dash.example.com/api");
        assert_eq!(config.timeout, Duration::from_millis(5_000));
        assert_eq!(config.read_retries, 4);
        assert_eq!(config.backoff_base, DEFAULT_BACKOFF_BASE);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = DashboardConfig::from_lookup(|key| {
            (key == ENV_TIMEOUT_MS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(DashboardError::Validation { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "base_url": "http://10.0.0.5:3000/api",
                "timeout_ms": 1500,
                "read_retries": 1,
                "rate_limit": {{"requests_per_second": 10, "burst_size": 20}},
                "toast_durations_ms": {{"success": 1000, "info": 2000, "warning": 3000, "error": 0}}
            }}"#
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://10.0.0.5:3000/api");
        assert_eq!(config.timeout, Duration::from_millis(1_500));
        assert_eq!(config.read_retries, 1);
        assert_eq!(
            config.rate_limit,
            Some(RateLimitConfig {
                requests_per_second: 10,
                burst_size: 20
            })
        );
        assert!(config.notifications.error_duration.is_zero());
    }

    #[test]
    fn test_from_file_errors() {
        assert!(DashboardConfig::from_file("/definitely/not/here.json").is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"unknown_key": true}}"#).unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }
}
