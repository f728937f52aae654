//! Configuration loading for notify-tui.
//!
//! All fields are required except `[retry].max_attempts` and the
//! `[endpoints]` table, which only carries overrides.

use notify_core::{Backoff, Resource, RetryPolicy, WidgetKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "NOTIFY_TUI_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    /// e.g. `ws://localhost:8000`; widget socket paths are appended.
    pub ws_base_url: String,
    pub request_timeout_ms: u64,
    pub tick_rate_ms: u64,
    pub log_path: PathBuf,
    pub retry: RetryConfig,
    /// Resource key -> path, replacing the built-in collection path.
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub interval_ms: u64,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    pub multiplier: f64,
    pub max_interval_ms: u64,
    pub jitter_ms: u64,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let backoff = if self.multiplier > 1.0 {
            Backoff::Exponential {
                multiplier: self.multiplier,
                max: Duration::from_millis(self.max_interval_ms),
            }
        } else {
            Backoff::Fixed
        };
        RetryPolicy {
            interval: Duration::from_millis(self.interval_ms),
            max_attempts: self.max_attempts,
            backoff,
            jitter: Duration::from_millis(self.jitter_ms),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or NOTIFY_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: TuiConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if self.ws_base_url.trim().is_empty() {
            return Err(invalid("ws_base_url", "must not be empty"));
        }
        if !(self.ws_base_url.starts_with("ws://") || self.ws_base_url.starts_with("wss://")) {
            return Err(invalid("ws_base_url", "must start with ws:// or wss://"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be > 0"));
        }
        if self.tick_rate_ms == 0 {
            return Err(invalid("tick_rate_ms", "must be > 0"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(invalid("log_path", "must not be empty"));
        }
        if self.retry.interval_ms == 0 {
            return Err(invalid("retry.interval_ms", "must be > 0"));
        }
        if self.retry.multiplier < 1.0 {
            return Err(invalid("retry.multiplier", "must be >= 1.0"));
        }
        if self.retry.max_interval_ms < self.retry.interval_ms {
            return Err(invalid("retry.max_interval_ms", "must be >= interval_ms"));
        }
        if self.retry.max_attempts == Some(0) {
            return Err(invalid("retry.max_attempts", "must be > 0 when set"));
        }
        for (key, path) in &self.endpoints {
            if find_resource(key).is_none() {
                return Err(invalid(format!("endpoints.{}", key), "unknown resource"));
            }
            if !path.starts_with('/') {
                return Err(invalid(format!("endpoints.{}", key), "path must start with '/'"));
            }
        }
        Ok(())
    }

    /// Collection path for `resource`, honoring `[endpoints]` overrides.
    pub fn path_for(&self, resource: &Resource) -> String {
        self.endpoints
            .get(resource.key)
            .cloned()
            .unwrap_or_else(|| resource.default_path.to_string())
    }
}

fn find_resource(key: &str) -> Option<&'static Resource> {
    WidgetKind::all()
        .iter()
        .flat_map(|kind| kind.resources().iter())
        .find(|resource| resource.key == key)
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
